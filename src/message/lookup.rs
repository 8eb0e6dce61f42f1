//! Key lookup
//!
//! Linear scan over a map's pairs. Documents hold tens of entries, so no
//! index is built.

use crate::codec::Value;
use crate::error::{MsgError, Result};

use super::Message;

/// Find the value of the first pair whose key is the string `key`
///
/// Keys compare byte for byte. Returns `None` when `node` is not a map or no
/// key matches; non-string keys never match.
pub fn lookup<'v>(node: &'v Value, key: &str) -> Option<&'v Value> {
    node.as_map()?
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, v)| v)
}

impl Message {
    /// Look up `key` in the root map (read mode only)
    pub fn lookup(&self, key: &str) -> Result<&Value> {
        let root = self.tree("lookup")?;
        lookup(root, key).ok_or_else(|| MsgError::KeyNotFound(key.to_string()))
    }

    /// Whether the root map has a pair keyed `key`
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(lookup(self.tree("contains_key")?, key).is_some())
    }

    /// String keys of the root map in document order, duplicates included
    pub fn keys(&self) -> Result<impl Iterator<Item = &str>> {
        let pairs = self.tree("keys")?.as_map().unwrap_or_default();
        Ok(pairs.iter().filter_map(|(k, _)| k.as_str()))
    }

    /// Number of pairs in the root map
    pub fn entry_count(&self) -> Result<usize> {
        Ok(self.tree("entry_count")?.as_map().map_or(0, |pairs| pairs.len()))
    }
}
