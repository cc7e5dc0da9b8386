//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their byte size.

// == Cache Entry ==
/// A single key-value pair held by the cache.
///
/// The key is fixed for the lifetime of the entry; the value may be replaced
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    key: String,
    value: String,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(key: String, value: String) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    // == Size ==
    /// Bytes this entry counts against the cache budget: key length plus
    /// value length, in bytes (not chars).
    pub fn size(&self) -> usize {
        entry_size(&self.key, &self.value)
    }

    // == Replace Value ==
    /// Swaps in a new value and returns the previous one.
    pub fn replace_value(&mut self, value: String) -> String {
        std::mem::replace(&mut self.value, value)
    }
}

// == Utility Functions ==
/// Byte size of a prospective entry.
pub fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
