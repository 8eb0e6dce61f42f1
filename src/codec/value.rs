//! Decoded value tree
//!
//! The in-memory form of one MessagePack value. Every node owns its payload,
//! so cloning a subtree yields a fully independent copy.

use std::fmt;

/// A decoded MessagePack value
///
/// Integers are classified by sign, not by the width of their wire tag:
/// any non-negative value is a [`Value::PositiveInteger`], any negative value
/// a [`Value::NegativeInteger`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    PositiveInteger(u64),
    NegativeInteger(i64),
    Float32(f32),
    Float64(f64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    /// Key/value pairs in document order; duplicate keys are kept
    Map(Vec<(Value, Value)>),
    Ext(i8, Vec<u8>),
}

impl Value {
    /// Build an integer node from a signed value, normalizing the sign class
    pub fn from_i64(value: i64) -> Self {
        if value < 0 {
            Value::NegativeInteger(value)
        } else {
            Value::PositiveInteger(value as u64)
        }
    }

    /// Short name of the node's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::PositiveInteger(_) | Value::NegativeInteger(_) => "integer",
            Value::Float32(_) | Value::Float64(_) => "float",
            Value::Str(_) => "string",
            Value::Bin(_) => "binary",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Ext(..) => "extension",
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::PositiveInteger(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::from_i64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for byte in bytes {
        write!(f, "{:02x}", byte)?;
    }
    Ok(())
}

/// Renders maps as `{"key"=>value, ...}` and arrays as `[a, b]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::PositiveInteger(n) => write!(f, "{}", n),
            Value::NegativeInteger(n) => write!(f, "{}", n),
            Value::Float32(x) => write!(f, "{:?}", x),
            Value::Float64(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bin(bytes) => {
                f.write_str("bin(")?;
                write_hex(f, bytes)?;
                f.write_str(")")
            }
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}=>{}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Ext(kind, data) => {
                write!(f, "ext({}, ", kind)?;
                write_hex(f, data)?;
                f.write_str(")")
            }
        }
    }
}
