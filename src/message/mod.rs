//! Message Module
//!
//! The dual-mode message object.
//!
//! ## Lifecycle
//! ```text
//!   Message::new()                     Message::parse(bytes)
//!        │                                    │
//!        ▼                                    ▼
//!   ┌──────────┐  serialize()/finalize() ┌──────────┐
//!   │  Build   │ ──────────────────────▶ │   Read   │
//!   │ (buffer) │                         │  (tree)  │
//!   └────┬─────┘                         └────┬─────┘
//!        │ release()                          │ clear() / release()
//!        ▼                                    ▼
//!   ┌─────────────────────────────────────────────┐
//!   │                    Empty                    │
//!   └─────────────────────────────────────────────┘
//! ```
//!
//! - **Build**: insertion calls append to an output buffer in document order.
//!   Nothing can be looked up until the buffer is parsed again.
//! - **Read**: wraps a decoded map tree. Immutable, any number of lookups.
//! - **Empty**: released or cleared. Every operation except `release` and
//!   `clear` fails with `InvalidState`.

mod access;
mod builder;
mod io;
mod lookup;
mod nested;

use std::fmt;

use bytes::Bytes;

use crate::codec::{decode_next, encode_value, DecodeError, Decoder, Value};
use crate::config::Config;
use crate::error::{MsgError, Result};
use builder::Builder;

pub use access::Narrow;
pub use io::{read_message, write_message};
pub use lookup::lookup;

/// Which half of the lifecycle a message is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Empty,
    Build,
    Read,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Empty => "empty",
            Mode::Build => "build",
            Mode::Read => "read",
        })
    }
}

#[derive(Debug)]
enum State {
    Empty,
    Building(Builder),
    /// Root is always a map
    Reading(Value),
}

/// A map-rooted document being built or read
#[derive(Debug)]
pub struct Message {
    config: Config,
    state: State,
}

impl Message {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an empty message in build mode with the default config
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create an empty message in build mode
    ///
    /// Reserves `config.initial_capacity` bytes; fails only with
    /// `AllocationFailed`.
    pub fn with_config(config: Config) -> Result<Self> {
        let builder = Builder::new(&config)?;
        Ok(Self {
            config,
            state: State::Building(builder),
        })
    }

    /// Parse a buffer into a read-mode message with the default config
    pub fn parse(buf: &[u8]) -> Result<Self> {
        Self::parse_with_config(buf, Config::default())
    }

    /// Parse a buffer into a read-mode message
    ///
    /// The buffer must hold exactly one value and that value must be a map.
    pub fn parse_with_config(buf: &[u8], config: Config) -> Result<Self> {
        if buf.is_empty() {
            return Err(MsgError::InvalidArgument(
                "cannot parse an empty buffer".to_string(),
            ));
        }

        let mut decoder = Decoder::new(buf).with_max_depth(config.max_depth);
        let root = decoder.read_value()?;

        if decoder.remaining() > 0 {
            return Err(DecodeError::TrailingBytes(decoder.remaining()).into());
        }
        let Value::Map(pairs) = &root else {
            return Err(MsgError::RootNotMap(root.type_name()));
        };

        tracing::debug!("Parsed {} bytes into a map of {} entries", buf.len(), pairs.len());

        Ok(Self::from_tree(root, config))
    }

    /// Wrap an already decoded map; callers guarantee `root` is a map
    pub(crate) fn from_tree(root: Value, config: Config) -> Self {
        debug_assert!(root.is_map());
        Self {
            config,
            state: State::Reading(root),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Current mode
    pub fn mode(&self) -> Mode {
        match self.state {
            State::Empty => Mode::Empty,
            State::Building(_) => Mode::Build,
            State::Reading(_) => Mode::Read,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Free the output buffer or decoded tree and leave the message empty
    ///
    /// Releasing an empty message is a no-op.
    pub fn release(&mut self) {
        if let State::Empty = self.state {
            return;
        }
        tracing::debug!("Releasing {} mode message", self.mode());
        self.state = State::Empty;
    }

    /// Reset the message
    ///
    /// Build mode keeps building from an empty buffer. Read mode discards the
    /// tree and becomes empty.
    pub fn clear(&mut self) {
        match self.state {
            State::Building(ref mut builder) => {
                tracing::debug!("Clearing build buffer of {} bytes", builder.len());
                builder.reset();
            }
            State::Reading(_) => {
                tracing::debug!("Discarding decoded tree");
                self.state = State::Empty;
            }
            State::Empty => {}
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The bytes written so far (build mode only)
    ///
    /// With entry tracking enabled, fails while declared entries are still
    /// outstanding.
    pub fn serialize(&self) -> Result<&[u8]> {
        match &self.state {
            State::Building(builder) => {
                builder.check_complete()?;
                Ok(builder.as_slice())
            }
            _ => Err(self.wrong_mode("serialize", Mode::Build)),
        }
    }

    /// Consume the message and hand over its buffer (build mode only)
    pub fn into_bytes(self) -> Result<Bytes> {
        let mode = self.mode();
        match self.state {
            State::Building(builder) => {
                builder.check_complete()?;
                Ok(Bytes::from(builder.into_inner()))
            }
            _ => Err(wrong_mode("into_bytes", Mode::Build, mode)),
        }
    }

    /// Parse the built buffer into a new read-mode message
    pub fn finalize(&self) -> Result<Message> {
        Message::parse_with_config(self.serialize()?, self.config.clone())
    }

    /// Re-encode the decoded tree (read mode only)
    ///
    /// Integers are written in their most compact form, so the bytes may be
    /// shorter than the buffer the message was parsed from.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let root = self.tree("encode")?;
        Ok(encode_value(root)?)
    }

    /// Borrow the root map (read mode only)
    pub fn root(&self) -> Result<&Value> {
        self.tree("root")
    }

    // =========================================================================
    // Mode Guards
    // =========================================================================

    fn wrong_mode(&self, operation: &str, required: Mode) -> MsgError {
        wrong_mode(operation, required, self.mode())
    }

    pub(crate) fn tree(&self, operation: &str) -> Result<&Value> {
        match &self.state {
            State::Reading(root) => Ok(root),
            _ => Err(self.wrong_mode(operation, Mode::Read)),
        }
    }

    pub(crate) fn builder_mut(&mut self, operation: &str) -> Result<&mut Builder> {
        let mode = self.mode();
        match &mut self.state {
            State::Building(builder) => Ok(builder),
            _ => Err(wrong_mode(operation, Mode::Build, mode)),
        }
    }
}

fn wrong_mode(operation: &str, required: Mode, actual: Mode) -> MsgError {
    MsgError::InvalidState(format!(
        "{} requires {} mode, message is in {} mode",
        operation, required, actual
    ))
}

/// Read mode prints the tree; build mode prints every value decoded from the
/// buffer so far, space separated.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Empty => Ok(()),
            State::Reading(root) => write!(f, "{}", root),
            State::Building(builder) => {
                let buf = builder.as_slice();
                let mut offset = 0;
                while offset < buf.len() {
                    if offset > 0 {
                        f.write_str(" ")?;
                    }
                    match decode_next(buf, offset) {
                        Ok((value, next)) => {
                            write!(f, "{}", value)?;
                            offset = next;
                        }
                        Err(e) => return write!(f, "<{}>", e),
                    }
                }
                Ok(())
            }
        }
    }
}
