//! MessagePack encoder
//!
//! Appends values to a growable output buffer. Each scalar or header write
//! reserves the space it needs up front, so a failed write leaves the buffer
//! untouched.

use super::marker::*;
use super::{EncodeError, Value};

/// Append-only MessagePack writer
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Create an encoder with an empty buffer
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create an encoder with `capacity` bytes reserved
    pub fn with_capacity(capacity: usize) -> Result<Self, EncodeError> {
        let mut buf = Vec::new();
        buf.try_reserve(capacity)?;
        Ok(Self { buf })
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Drop all written bytes, keeping the allocation
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Roll the buffer back to `len` bytes
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Write `head` then `body` after a single reservation
    fn put(&mut self, head: &[u8], body: &[u8]) -> Result<(), EncodeError> {
        self.buf.try_reserve(head.len() + body.len())?;
        self.buf.extend_from_slice(head);
        self.buf.extend_from_slice(body);
        Ok(())
    }

    fn put_marker(&mut self, marker: u8, body: &[u8]) -> Result<(), EncodeError> {
        self.put(&[marker], body)
    }

    // =========================================================================
    // Headers
    // =========================================================================

    /// Write a map header announcing `count` key/value pairs
    pub fn write_map_header(&mut self, count: u32) -> Result<(), EncodeError> {
        self.write_container_header(count, FIXMAP, MAP16, MAP32)
    }

    /// Write an array header announcing `count` values
    pub fn write_array_header(&mut self, count: u32) -> Result<(), EncodeError> {
        self.write_container_header(count, FIXARRAY, ARRAY16, ARRAY32)
    }

    fn write_container_header(
        &mut self,
        count: u32,
        fix: u8,
        m16: u8,
        m32: u8,
    ) -> Result<(), EncodeError> {
        if count <= FIX_CONTAINER_MAX {
            self.put(&[fix | count as u8], &[])
        } else if count <= u16::MAX as u32 {
            self.put_marker(m16, &(count as u16).to_be_bytes())
        } else {
            self.put_marker(m32, &count.to_be_bytes())
        }
    }

    /// Header for a length-prefixed payload using the 8/16/32-bit markers
    ///
    /// The buffer has one spare byte after the longest header for the ext
    /// type byte.
    fn length_header(len: usize, markers: [u8; 3]) -> Result<([u8; 6], usize), EncodeError> {
        let mut head = [0u8; 6];
        let head_len = if len <= u8::MAX as usize {
            head[0] = markers[0];
            head[1] = len as u8;
            2
        } else if len <= u16::MAX as usize {
            head[0] = markers[1];
            head[1..3].copy_from_slice(&(len as u16).to_be_bytes());
            3
        } else {
            let len32 = u32::try_from(len).map_err(|_| EncodeError::LengthOverflow(len))?;
            head[0] = markers[2];
            head[1..5].copy_from_slice(&len32.to_be_bytes());
            5
        };
        Ok((head, head_len))
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    pub fn write_nil(&mut self) -> Result<(), EncodeError> {
        self.put(&[NIL], &[])
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.put(&[if value { TRUE } else { FALSE }], &[])
    }

    /// Write a UTF-8 string using the shortest header that fits
    pub fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        let bytes = s.as_bytes();
        if bytes.len() <= FIXSTR_MAX {
            return self.put(&[FIXSTR | bytes.len() as u8], bytes);
        }
        let (head, head_len) = Self::length_header(bytes.len(), [STR8, STR16, STR32])?;
        self.put(&head[..head_len], bytes)
    }

    pub fn write_bin(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        let (head, head_len) = Self::length_header(data.len(), [BIN8, BIN16, BIN32])?;
        self.put(&head[..head_len], data)
    }

    pub fn write_ext(&mut self, kind: i8, data: &[u8]) -> Result<(), EncodeError> {
        let fixed = match data.len() {
            1 => Some(FIXEXT1),
            2 => Some(FIXEXT2),
            4 => Some(FIXEXT4),
            8 => Some(FIXEXT8),
            16 => Some(FIXEXT16),
            _ => None,
        };
        if let Some(marker) = fixed {
            return self.put(&[marker, kind as u8], data);
        }
        let (mut head, head_len) = Self::length_header(data.len(), [EXT8, EXT16, EXT32])?;
        head[head_len] = kind as u8;
        self.put(&head[..=head_len], data)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), EncodeError> {
        self.put_marker(FLOAT32, &value.to_be_bytes())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), EncodeError> {
        self.put_marker(FLOAT64, &value.to_be_bytes())
    }

    // -------------------------------------------------------------------------
    // Fixed-width integers: the tag always matches the declared width
    // -------------------------------------------------------------------------

    pub fn write_i8(&mut self, value: i8) -> Result<(), EncodeError> {
        self.put_marker(INT8, &value.to_be_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), EncodeError> {
        self.put_marker(INT16, &value.to_be_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), EncodeError> {
        self.put_marker(INT32, &value.to_be_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), EncodeError> {
        self.put_marker(INT64, &value.to_be_bytes())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.put_marker(UINT8, &value.to_be_bytes())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.put_marker(UINT16, &value.to_be_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.put_marker(UINT32, &value.to_be_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), EncodeError> {
        self.put_marker(UINT64, &value.to_be_bytes())
    }

    // -------------------------------------------------------------------------
    // Compact integers: smallest encoding that holds the value
    // -------------------------------------------------------------------------

    pub fn write_compact_uint(&mut self, value: u64) -> Result<(), EncodeError> {
        if value <= POSITIVE_FIXINT_MAX as u64 {
            self.put(&[value as u8], &[])
        } else if value <= u8::MAX as u64 {
            self.write_u8(value as u8)
        } else if value <= u16::MAX as u64 {
            self.write_u16(value as u16)
        } else if value <= u32::MAX as u64 {
            self.write_u32(value as u32)
        } else {
            self.write_u64(value)
        }
    }

    pub fn write_compact_int(&mut self, value: i64) -> Result<(), EncodeError> {
        if value >= 0 {
            self.write_compact_uint(value as u64)
        } else if value >= -32 {
            self.put(&[value as i8 as u8], &[])
        } else if value >= i8::MIN as i64 {
            self.write_i8(value as i8)
        } else if value >= i16::MIN as i64 {
            self.write_i16(value as i16)
        } else if value >= i32::MIN as i64 {
            self.write_i32(value as i32)
        } else {
            self.write_i64(value)
        }
    }

    // =========================================================================
    // Trees
    // =========================================================================

    /// Write a whole value tree, integers in compact form
    pub fn write_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Boolean(b) => self.write_bool(*b),
            Value::PositiveInteger(n) => self.write_compact_uint(*n),
            Value::NegativeInteger(n) => self.write_compact_int(*n),
            Value::Float32(x) => self.write_f32(*x),
            Value::Float64(x) => self.write_f64(*x),
            Value::Str(s) => self.write_str(s),
            Value::Bin(data) => self.write_bin(data),
            Value::Array(items) => {
                self.write_array_header(container_len(items.len())?)?;
                for item in items {
                    self.write_value(item)?;
                }
                Ok(())
            }
            Value::Map(pairs) => {
                self.write_map_header(container_len(pairs.len())?)?;
                for (key, item) in pairs {
                    self.write_value(key)?;
                    self.write_value(item)?;
                }
                Ok(())
            }
            Value::Ext(kind, data) => self.write_ext(*kind, data),
        }
    }
}

fn container_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::LengthOverflow(len))
}

/// Encode a value tree into a fresh buffer
pub fn encode_value(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::new();
    encoder.write_value(value)?;
    Ok(encoder.into_inner())
}
