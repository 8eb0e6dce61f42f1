//! MessagePack decoder
//!
//! Decodes one value at a time from a borrowed byte slice into an owned
//! [`Value`] tree. Strings and binary payloads are copied out of the input,
//! so the tree never refers back to the buffer it came from.

use super::marker::*;
use super::{DecodeError, Value};

/// Container nesting accepted when no explicit limit is given
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling on container nesting; decoding recurses once per level
pub const MAX_DEPTH_LIMIT: usize = 512;

/// Cursor over a MessagePack byte slice
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit container nesting; the outermost container is depth 1
    ///
    /// Values above [`MAX_DEPTH_LIMIT`] are clamped to it.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    /// Move the cursor to `offset`
    pub fn seek(&mut self, offset: usize) -> Result<(), DecodeError> {
        if offset > self.data.len() {
            return Err(DecodeError::UnexpectedEof(offset));
        }
        self.pos = offset;
        Ok(())
    }

    /// Current cursor offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Decode the value at the cursor and advance past it
    pub fn read_value(&mut self) -> Result<Value, DecodeError> {
        self.read_at_depth(1)
    }

    // =========================================================================
    // Raw Reads
    // =========================================================================

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::UnexpectedEof(self.pos))?;
        let data = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    fn str(&mut self, len: usize) -> Result<Value, DecodeError> {
        let start = self.pos;
        let bytes = self.take(len)?;
        let s = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(start))?;
        Ok(Value::Str(s.to_owned()))
    }

    fn bin(&mut self, len: usize) -> Result<Value, DecodeError> {
        Ok(Value::Bin(self.take(len)?.to_vec()))
    }

    fn ext(&mut self, len: usize) -> Result<Value, DecodeError> {
        let kind = self.u8()? as i8;
        Ok(Value::Ext(kind, self.take(len)?.to_vec()))
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn read_at_depth(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let offset = self.pos;
        let marker = self.u8()?;

        match marker {
            // positive fixint
            0x00..=0x7f => Ok(Value::PositiveInteger(marker as u64)),
            // fixmap
            0x80..=0x8f => self.read_map((marker & 0x0f) as usize, depth),
            // fixarray
            0x90..=0x9f => self.read_array((marker & 0x0f) as usize, depth),
            // fixstr
            0xa0..=0xbf => self.str((marker & 0x1f) as usize),
            // negative fixint
            NEGATIVE_FIXINT_MIN..=u8::MAX => Ok(Value::NegativeInteger(marker as i8 as i64)),

            NIL => Ok(Value::Nil),
            FALSE => Ok(Value::Boolean(false)),
            TRUE => Ok(Value::Boolean(true)),

            BIN8 => {
                let len = self.u8()? as usize;
                self.bin(len)
            }
            BIN16 => {
                let len = self.u16()? as usize;
                self.bin(len)
            }
            BIN32 => {
                let len = self.u32()? as usize;
                self.bin(len)
            }

            EXT8 => {
                let len = self.u8()? as usize;
                self.ext(len)
            }
            EXT16 => {
                let len = self.u16()? as usize;
                self.ext(len)
            }
            EXT32 => {
                let len = self.u32()? as usize;
                self.ext(len)
            }

            FLOAT32 => Ok(Value::Float32(f32::from_be_bytes(self.array()?))),
            FLOAT64 => Ok(Value::Float64(f64::from_be_bytes(self.array()?))),

            UINT8 => Ok(Value::PositiveInteger(self.u8()? as u64)),
            UINT16 => Ok(Value::PositiveInteger(self.u16()? as u64)),
            UINT32 => Ok(Value::PositiveInteger(self.u32()? as u64)),
            UINT64 => Ok(Value::PositiveInteger(self.u64()?)),

            INT8 => Ok(Value::from_i64(i8::from_be_bytes(self.array()?) as i64)),
            INT16 => Ok(Value::from_i64(i16::from_be_bytes(self.array()?) as i64)),
            INT32 => Ok(Value::from_i64(i32::from_be_bytes(self.array()?) as i64)),
            INT64 => Ok(Value::from_i64(i64::from_be_bytes(self.array()?))),

            FIXEXT1 => self.ext(1),
            FIXEXT2 => self.ext(2),
            FIXEXT4 => self.ext(4),
            FIXEXT8 => self.ext(8),
            FIXEXT16 => self.ext(16),

            STR8 => {
                let len = self.u8()? as usize;
                self.str(len)
            }
            STR16 => {
                let len = self.u16()? as usize;
                self.str(len)
            }
            STR32 => {
                let len = self.u32()? as usize;
                self.str(len)
            }

            ARRAY16 => {
                let len = self.u16()? as usize;
                self.read_array(len, depth)
            }
            ARRAY32 => {
                let len = self.u32()? as usize;
                self.read_array(len, depth)
            }

            MAP16 => {
                let len = self.u16()? as usize;
                self.read_map(len, depth)
            }
            MAP32 => {
                let len = self.u32()? as usize;
                self.read_map(len, depth)
            }

            NEVER_USED => Err(DecodeError::InvalidMarker { marker, offset }),
        }
    }

    fn read_array(&mut self, len: usize, depth: usize) -> Result<Value, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::DepthExceeded(self.max_depth));
        }
        // Every element takes at least one byte, so a lying header cannot
        // force a large allocation.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(self.read_at_depth(depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, len: usize, depth: usize) -> Result<Value, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::DepthExceeded(self.max_depth));
        }
        let mut pairs = Vec::with_capacity(len.min(self.remaining() / 2));
        for _ in 0..len {
            let key = self.read_at_depth(depth + 1)?;
            let value = self.read_at_depth(depth + 1)?;
            pairs.push((key, value));
        }
        Ok(Value::Map(pairs))
    }
}

/// Decode one value starting at `offset`
///
/// Returns the value and the offset just past it.
pub fn decode_next(buf: &[u8], offset: usize) -> Result<(Value, usize), DecodeError> {
    let mut decoder = Decoder::new(buf);
    decoder.seek(offset)?;
    let value = decoder.read_value()?;
    Ok((value, decoder.position()))
}
