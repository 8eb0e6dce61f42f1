//! Typed accessors
//!
//! Every integer is read through a 64-bit intermediate (`u64` for
//! non-negative values, `i64` for negative ones) and then narrowed to the
//! requested width by [`narrow`]. A value that does not fit is `OutOfRange`,
//! never truncated.

use crate::codec::Value;
use crate::error::{MsgError, Result};

use super::Message;

mod sealed {
    pub trait Sealed {}
}

/// Fixed-width integer types an accessor can narrow to
pub trait Narrow: sealed::Sealed + TryFrom<u64> + TryFrom<i64> + Copy {
    /// Type name used in error messages
    const NAME: &'static str;
}

macro_rules! impl_narrow {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}
            impl Narrow for $t {
                const NAME: &'static str = stringify!($t);
            }
        )*
    };
}

impl_narrow!(i8, i16, i32, i64, u8, u16, u32, u64);

pub(crate) fn type_mismatch(key: &str, expected: &'static str, found: &Value) -> MsgError {
    MsgError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

/// Narrow an integer node to `T`
fn narrow<T: Narrow>(key: &str, value: &Value) -> Result<T> {
    let (narrowed, wide) = match *value {
        Value::PositiveInteger(raw) => (<T as TryFrom<u64>>::try_from(raw).ok(), raw as i128),
        Value::NegativeInteger(raw) => (<T as TryFrom<i64>>::try_from(raw).ok(), raw as i128),
        ref other => return Err(type_mismatch(key, "integer", other)),
    };
    narrowed.ok_or_else(|| MsgError::OutOfRange {
        key: key.to_string(),
        value: wide,
        target: T::NAME,
    })
}

impl Message {
    /// Read `key` as any fixed-width integer type
    ///
    /// ```
    /// use mapmsg::Message;
    ///
    /// let mut msg = Message::new().unwrap();
    /// msg.insert_map(1).unwrap();
    /// msg.insert_pair_i32("threshold", 10).unwrap();
    ///
    /// let msg = msg.finalize().unwrap();
    /// assert_eq!(msg.get::<u8>("threshold").unwrap(), 10);
    /// ```
    pub fn get<T: Narrow>(&self, key: &str) -> Result<T> {
        narrow(key, self.lookup(key)?)
    }

    pub fn get_i8_from_key(&self, key: &str) -> Result<i8> {
        self.get(key)
    }

    pub fn get_i16_from_key(&self, key: &str) -> Result<i16> {
        self.get(key)
    }

    pub fn get_i32_from_key(&self, key: &str) -> Result<i32> {
        self.get(key)
    }

    pub fn get_i64_from_key(&self, key: &str) -> Result<i64> {
        self.get(key)
    }

    pub fn get_u8_from_key(&self, key: &str) -> Result<u8> {
        self.get(key)
    }

    pub fn get_u16_from_key(&self, key: &str) -> Result<u16> {
        self.get(key)
    }

    pub fn get_u32_from_key(&self, key: &str) -> Result<u32> {
        self.get(key)
    }

    pub fn get_u64_from_key(&self, key: &str) -> Result<u64> {
        self.get(key)
    }

    /// Copy out the string stored under `key`
    pub fn get_str_from_key(&self, key: &str) -> Result<String> {
        match self.lookup(key)? {
            Value::Str(s) => Ok(s.clone()),
            other => Err(type_mismatch(key, "string", other)),
        }
    }

    pub fn get_bool_from_key(&self, key: &str) -> Result<bool> {
        match self.lookup(key)? {
            Value::Boolean(b) => Ok(*b),
            other => Err(type_mismatch(key, "boolean", other)),
        }
    }
}
