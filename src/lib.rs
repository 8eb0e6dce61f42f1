//! # mapmsg
//!
//! Typed construction and inspection of MessagePack documents whose root is
//! a map with string keys:
//! - Build mode appends fixed-width integers, strings and nested maps
//! - Read mode decodes a buffer once and answers typed lookups by key
//! - Narrowing accessors refuse values that do not fit the requested width
//!
//! ## Architecture Overview
//!
//! ```text
//!   insert_* calls                          parse(&[u8])
//!        │                                       │
//! ┌──────▼──────┐                         ┌──────▼──────┐
//! │   Builder   │                         │   Decoder   │
//! │  (Encoder + │                         │ (Value tree)│
//! │   tracker)  │                         └──────┬──────┘
//! └──────┬──────┘                                │
//!        │ serialize()                           ▼
//!        ▼                              ┌─────────────────┐
//!    MessagePack bytes ───────────────▶ │ lookup / get_*  │
//!                                       │ nested views    │
//!                                       └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use mapmsg::Message;
//!
//! let mut msg = Message::new().unwrap();
//! msg.insert_map(2).unwrap();
//! msg.insert_pair_i32("control", 0).unwrap();
//! msg.insert_nested_map("data", 1).unwrap();
//! msg.insert_pair_i32("src_address", 30).unwrap();
//!
//! let bytes = msg.serialize().unwrap().to_vec();
//! let read = Message::parse(&bytes).unwrap();
//! let data = read.get_nested_map_from_key("data").unwrap();
//! assert_eq!(data.get_i32_from_key("src_address").unwrap(), 30);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod message;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, MsgError, Result};
pub use config::Config;
pub use codec::Value;
pub use message::{lookup, read_message, write_message, Message, Mode, Narrow};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mapmsg
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
