//! Storage Module
//!
//! The key-value storage contract that server-side code programs against.

use crate::cache::BoundedLruCache;
use crate::error::Result;

// == Storage Trait ==
/// Generic key-value storage interface.
///
/// Implementations are not required to be thread-safe. Callers sharing one
/// instance serialize access themselves, holding a single lock for the whole
/// of each call.
pub trait Storage {
    /// Inserts or updates `key`.
    fn put(&mut self, key: String, value: String) -> Result<()>;

    /// Inserts `key` only if it is absent.
    fn put_if_absent(&mut self, key: String, value: String) -> Result<()>;

    /// Updates `key` only if it is present.
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Removes `key`.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Returns an owned copy of the value for `key`.
    fn get(&mut self, key: &str) -> Result<String>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for BoundedLruCache {
    fn put(&mut self, key: String, value: String) -> Result<()> {
        BoundedLruCache::put(self, key, value)
    }

    fn put_if_absent(&mut self, key: String, value: String) -> Result<()> {
        BoundedLruCache::put_if_absent(self, key, value)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        BoundedLruCache::set(self, key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        BoundedLruCache::delete(self, key)
    }

    fn get(&mut self, key: &str) -> Result<String> {
        BoundedLruCache::get(self, key).map(str::to_string)
    }

    fn len(&self) -> usize {
        BoundedLruCache::len(self)
    }
}
