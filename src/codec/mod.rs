//! Codec Module
//!
//! MessagePack encoding and decoding for the subset of the format messages use.
//!
//! ## Wire Format
//!
//! Every value starts with a one-byte marker. Maps carry an explicit entry
//! count followed by that many key/value pairs in document order.
//!
//! ```text
//! ┌──────────────┬───────────────────┬──────────────────────────────┐
//! │ Marker       │ Length / Value    │ Meaning                      │
//! ├──────────────┼───────────────────┼──────────────────────────────┤
//! │ 0x00 - 0x7f  │ in marker         │ positive fixint              │
//! │ 0x80 - 0x8f  │ n in low nibble   │ fixmap, n pairs follow       │
//! │ 0x90 - 0x9f  │ n in low nibble   │ fixarray, n values follow    │
//! │ 0xa0 - 0xbf  │ n in low 5 bits   │ fixstr, n bytes follow       │
//! │ 0xc0/c2/c3   │ -                 │ nil / false / true           │
//! │ 0xc4 - 0xc6  │ 1/2/4 byte length │ bin8 / bin16 / bin32         │
//! │ 0xc7 - 0xc9  │ 1/2/4 byte length │ ext8 / ext16 / ext32         │
//! │ 0xca / 0xcb  │ 4 / 8 bytes       │ float32 / float64            │
//! │ 0xcc - 0xcf  │ 1/2/4/8 bytes     │ uint8 / 16 / 32 / 64         │
//! │ 0xd0 - 0xd3  │ 1/2/4/8 bytes     │ int8 / 16 / 32 / 64          │
//! │ 0xd4 - 0xd8  │ type + 1..16      │ fixext                       │
//! │ 0xd9 - 0xdb  │ 1/2/4 byte length │ str8 / str16 / str32         │
//! │ 0xdc / 0xdd  │ 2/4 byte count    │ array16 / array32            │
//! │ 0xde / 0xdf  │ 2/4 byte count    │ map16 / map32                │
//! │ 0xe0 - 0xff  │ in marker         │ negative fixint              │
//! └──────────────┴───────────────────┴──────────────────────────────┘
//! ```
//!
//! All multi-byte fields are big-endian. 0xc1 is never used.

pub mod marker;
mod decoder;
mod encoder;
mod error;
mod value;

pub use decoder::{decode_next, Decoder, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
pub use encoder::{encode_value, Encoder};
pub use error::{DecodeError, EncodeError};
pub use value::Value;
