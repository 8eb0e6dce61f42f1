//! Error types for mapmsg
//!
//! Every fallible message operation returns [`MsgError`]. The variants carry
//! context for humans; [`MsgError::kind`] collapses them onto the closed
//! [`ErrorKind`] set callers branch on.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};

/// Result type alias using MsgError
pub type Result<T> = std::result::Result<T, MsgError>;

/// Closed set of failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    KeyNotFound,
    InvalidState,
    InvalidArgument,
    ParseError,
    TypeMismatch,
    OutOfRange,
    AllocationFailed,
}

/// Unified error type for message operations
#[derive(Debug, Error)]
pub enum MsgError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {0:?}")]
    KeyNotFound(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Decoding Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(#[from] DecodeError),

    #[error("Parse error: root value is {0}, expected map")]
    RootNotMap(&'static str),

    // -------------------------------------------------------------------------
    // Accessor Errors
    // -------------------------------------------------------------------------
    #[error("Type mismatch for key {key:?}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value {value} for key {key:?} does not fit in {target}")]
    OutOfRange {
        key: String,
        value: i128,
        target: &'static str,
    },

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("Allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),
}

impl MsgError {
    /// The kind this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            MsgError::KeyNotFound(_) => ErrorKind::KeyNotFound,
            MsgError::InvalidState(_) => ErrorKind::InvalidState,
            MsgError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            MsgError::Parse(_) | MsgError::RootNotMap(_) => ErrorKind::ParseError,
            MsgError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            MsgError::OutOfRange { .. } => ErrorKind::OutOfRange,
            MsgError::AllocationFailed(_) => ErrorKind::AllocationFailed,
        }
    }
}

impl From<EncodeError> for MsgError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Alloc(e) => MsgError::AllocationFailed(e),
            EncodeError::LengthOverflow(len) => MsgError::InvalidArgument(format!(
                "length {} exceeds the 32-bit length field",
                len
            )),
        }
    }
}

impl From<MsgError> for std::io::Error {
    fn from(err: MsgError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, err)
    }
}
