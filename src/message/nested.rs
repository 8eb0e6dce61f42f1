//! Nested view extraction
//!
//! A nested view owns a deep copy of the sub-map it was taken from. Parent
//! and view can be released in any order.

use crate::error::Result;

use super::access::type_mismatch;
use super::Message;

impl Message {
    /// Extract the map stored under `key` as an independent read-mode message
    ///
    /// The view inherits this message's config.
    pub fn get_nested_map_from_key(&self, key: &str) -> Result<Message> {
        let value = self.lookup(key)?;
        if !value.is_map() {
            return Err(type_mismatch(key, "map", value));
        }

        let subtree = value.clone();
        tracing::debug!(
            "Extracted nested map {:?} with {} entries",
            key,
            subtree.as_map().map_or(0, |pairs| pairs.len())
        );

        Ok(Message::from_tree(subtree, self.config().clone()))
    }
}
