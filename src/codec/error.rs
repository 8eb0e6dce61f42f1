//! Codec error types

use std::collections::TryReserveError;

use thiserror::Error;

/// Failure while decoding a MessagePack value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),

    #[error("invalid marker byte 0x{marker:02x} at offset {offset}")]
    InvalidMarker { marker: u8, offset: usize },

    #[error("invalid UTF-8 in string at offset {0}")]
    InvalidUtf8(usize),

    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),

    #[error("{0} trailing bytes after the top-level value")]
    TrailingBytes(usize),
}

/// Failure while encoding into an output buffer
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("output buffer growth failed: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("length {0} does not fit a 32-bit length field")]
    LengthOverflow(usize),
}
