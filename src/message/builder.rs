//! Build-mode state and insertion operations
//!
//! Insertions append key/value bytes in document order. Map headers are
//! written before their entries and are never patched afterwards, so the
//! caller declares every entry count up front.

use crate::codec::{EncodeError, Encoder};
use crate::config::Config;
use crate::error::{MsgError, Result};

use super::Message;

/// A scalar value ready to be written after its key
#[derive(Debug, Clone, Copy)]
pub(crate) enum Scalar<'a> {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Str(&'a str),
    Bool(bool),
}

impl Scalar<'_> {
    fn write(self, encoder: &mut Encoder) -> std::result::Result<(), EncodeError> {
        match self {
            Scalar::I8(v) => encoder.write_i8(v),
            Scalar::I16(v) => encoder.write_i16(v),
            Scalar::I32(v) => encoder.write_i32(v),
            Scalar::I64(v) => encoder.write_i64(v),
            Scalar::U8(v) => encoder.write_u8(v),
            Scalar::U16(v) => encoder.write_u16(v),
            Scalar::U32(v) => encoder.write_u32(v),
            Scalar::U64(v) => encoder.write_u64(v),
            Scalar::Str(v) => encoder.write_str(v),
            Scalar::Bool(v) => encoder.write_bool(v),
        }
    }
}

// =============================================================================
// Entry Tracking
// =============================================================================

/// Remaining entry counts of the maps currently open, innermost last
///
/// Maps whose count reaches zero are popped immediately, so every frame on
/// the stack still has room for at least one entry.
#[derive(Debug, Default)]
struct EntryTracker {
    open: Vec<u32>,
    root_closed: bool,
}

impl EntryTracker {
    fn check_root(&self) -> Result<()> {
        if !self.open.is_empty() {
            return Err(violation(
                "insert_map inside an open map; use insert_nested_map for nested maps",
            ));
        }
        if self.root_closed {
            return Err(violation("the root map is already complete"));
        }
        Ok(())
    }

    fn check_entry(&self) -> Result<()> {
        if self.open.is_empty() {
            return Err(violation("no open map has room for another entry"));
        }
        Ok(())
    }

    fn open_root(&mut self, count: u32) {
        self.open.push(count);
        self.close_finished();
    }

    fn record_entry(&mut self) {
        if let Some(remaining) = self.open.last_mut() {
            *remaining -= 1;
        }
        self.close_finished();
    }

    fn open_nested(&mut self, count: u32) {
        if let Some(remaining) = self.open.last_mut() {
            *remaining -= 1;
        }
        self.open.push(count);
        self.close_finished();
    }

    fn close_finished(&mut self) {
        let mut closed = false;
        while let Some(&0) = self.open.last() {
            self.open.pop();
            closed = true;
        }
        if closed && self.open.is_empty() {
            self.root_closed = true;
        }
    }

    fn check_complete(&self) -> Result<()> {
        if self.open.is_empty() {
            return Ok(());
        }
        let outstanding: u64 = self.open.iter().map(|&n| n as u64).sum();
        Err(violation(&format!(
            "document incomplete: {} declared entries across {} open maps still missing",
            outstanding,
            self.open.len()
        )))
    }
}

fn violation(reason: &str) -> MsgError {
    tracing::warn!("Entry count violation: {}", reason);
    MsgError::InvalidState(reason.to_string())
}

// =============================================================================
// Builder
// =============================================================================

/// Output buffer plus optional entry tracker
#[derive(Debug)]
pub(crate) struct Builder {
    encoder: Encoder,
    tracker: Option<EntryTracker>,
}

impl Builder {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            encoder: Encoder::with_capacity(config.initial_capacity)?,
            tracker: config.track_entry_counts.then(EntryTracker::default),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.encoder.len()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        self.encoder.as_slice()
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.encoder.into_inner()
    }

    /// Empty the buffer and forget all open maps
    pub(crate) fn reset(&mut self) {
        self.encoder.clear();
        if let Some(tracker) = self.tracker.as_mut() {
            *tracker = EntryTracker::default();
        }
    }

    pub(crate) fn check_complete(&self) -> Result<()> {
        match &self.tracker {
            Some(tracker) => tracker.check_complete(),
            None => Ok(()),
        }
    }

    /// Run `write` against the encoder, rolling back on failure
    fn append<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut Encoder) -> std::result::Result<(), EncodeError>,
    {
        let mark = self.encoder.len();
        if let Err(e) = write(&mut self.encoder) {
            self.encoder.truncate(mark);
            return Err(e.into());
        }
        Ok(())
    }

    fn map(&mut self, count: u32) -> Result<()> {
        if let Some(tracker) = &self.tracker {
            tracker.check_root()?;
        }
        self.append(|enc| enc.write_map_header(count))?;
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.open_root(count);
        }
        Ok(())
    }

    fn nested_map(&mut self, key: &str, count: u32) -> Result<()> {
        if let Some(tracker) = &self.tracker {
            tracker.check_entry()?;
        }
        self.append(|enc| {
            enc.write_str(key)?;
            enc.write_map_header(count)
        })?;
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.open_nested(count);
        }
        Ok(())
    }

    fn pair(&mut self, key: &str, value: Scalar<'_>) -> Result<()> {
        if let Some(tracker) = &self.tracker {
            tracker.check_entry()?;
        }
        self.append(|enc| {
            enc.write_str(key)?;
            value.write(enc)
        })?;
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.record_entry();
        }
        Ok(())
    }
}

// =============================================================================
// Insertion Operations
// =============================================================================

impl Message {
    /// Start a top-level map that will hold `entry_count` pairs
    pub fn insert_map(&mut self, entry_count: u32) -> Result<()> {
        tracing::trace!("insert_map({})", entry_count);
        self.builder_mut("insert_map")?.map(entry_count)
    }

    /// Write `key` followed by a map header for `entry_count` pairs
    ///
    /// The next `entry_count` insertions fill the nested map.
    pub fn insert_nested_map(&mut self, key: &str, entry_count: u32) -> Result<()> {
        tracing::trace!("insert_nested_map({:?}, {})", key, entry_count);
        self.builder_mut("insert_nested_map")?
            .nested_map(key, entry_count)
    }

    fn insert_scalar(&mut self, operation: &str, key: &str, value: Scalar<'_>) -> Result<()> {
        tracing::trace!("{}({:?}, {:?})", operation, key, value);
        self.builder_mut(operation)?.pair(key, value)
    }

    pub fn insert_pair_i8(&mut self, key: &str, value: i8) -> Result<()> {
        self.insert_scalar("insert_pair_i8", key, Scalar::I8(value))
    }

    pub fn insert_pair_i16(&mut self, key: &str, value: i16) -> Result<()> {
        self.insert_scalar("insert_pair_i16", key, Scalar::I16(value))
    }

    pub fn insert_pair_i32(&mut self, key: &str, value: i32) -> Result<()> {
        self.insert_scalar("insert_pair_i32", key, Scalar::I32(value))
    }

    pub fn insert_pair_i64(&mut self, key: &str, value: i64) -> Result<()> {
        self.insert_scalar("insert_pair_i64", key, Scalar::I64(value))
    }

    pub fn insert_pair_u8(&mut self, key: &str, value: u8) -> Result<()> {
        self.insert_scalar("insert_pair_u8", key, Scalar::U8(value))
    }

    pub fn insert_pair_u16(&mut self, key: &str, value: u16) -> Result<()> {
        self.insert_scalar("insert_pair_u16", key, Scalar::U16(value))
    }

    pub fn insert_pair_u32(&mut self, key: &str, value: u32) -> Result<()> {
        self.insert_scalar("insert_pair_u32", key, Scalar::U32(value))
    }

    pub fn insert_pair_u64(&mut self, key: &str, value: u64) -> Result<()> {
        self.insert_scalar("insert_pair_u64", key, Scalar::U64(value))
    }

    /// Insert a string value; the bytes are copied into the buffer
    pub fn insert_pair_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.insert_scalar("insert_pair_str", key, Scalar::Str(value))
    }

    pub fn insert_pair_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.insert_scalar("insert_pair_bool", key, Scalar::Bool(value))
    }
}
