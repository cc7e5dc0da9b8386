//! Cache Store Module
//!
//! Main cache engine combining the key index, the recency list and the byte
//! accountant.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::cache::{entry_size, CacheEntry, CacheStats, EntryHandle, LruList, SizeAccountant};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Bounded LRU Cache ==
/// Byte-budgeted key-value cache with least recently used eviction.
///
/// The total size of all keys and values never exceeds the configured
/// capacity. Inserts and growing updates evict from the least recently used
/// end, one entry at a time, until the new data fits.
///
/// Not thread-safe: wrap it in a lock held for the whole of each operation
/// if several callers share it.
#[derive(Debug)]
pub struct BoundedLruCache {
    /// Key -> handle into `entries`
    index: HashMap<String, EntryHandle>,
    /// Owns every entry, in recency order
    entries: LruList,
    /// Byte budget bookkeeping
    accountant: SizeAccountant,
    /// Performance statistics
    stats: CacheStats,
}

impl BoundedLruCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity_bytes` of keys and
    /// values.
    ///
    /// Fails with [`CacheError::InvalidConfig`] for a zero budget.
    pub fn new(capacity_bytes: usize) -> Result<Self> {
        Self::from_config(&CacheConfig::new(capacity_bytes))
    }

    /// Creates an empty cache from a loaded configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            index: HashMap::new(),
            entries: LruList::new(),
            accountant: SizeAccountant::new(config.capacity_bytes),
            stats: CacheStats {
                capacity_bytes: config.capacity_bytes,
                ..CacheStats::default()
            },
        })
    }

    // == Put ==
    /// Inserts a new entry or updates an existing one.
    ///
    /// Behaves as [`set`](Self::set) when the key is present and as
    /// [`put_if_absent`](Self::put_if_absent) otherwise.
    pub fn put(&mut self, key: String, value: String) -> Result<()> {
        self.validate_entry(&key, &value)?;
        if self.index.contains_key(&key) {
            self.set(&key, value)
        } else {
            self.put_if_absent(key, value)
        }
    }

    // == Put If Absent ==
    /// Inserts a new entry, evicting least recently used entries until it
    /// fits. Fails if the key is already present.
    pub fn put_if_absent(&mut self, key: String, value: String) -> Result<()> {
        let size = self.validate_entry(&key, &value)?;
        if self.index.contains_key(&key) {
            return Err(CacheError::KeyAlreadyExists(key));
        }

        while !self.accountant.reserve(size) {
            self.free_front();
        }

        trace!(key = %key, bytes = size, "inserting entry");
        let handle = self.entries.push_back(CacheEntry::new(key.clone(), value));
        self.index.insert(key, handle);

        self.debug_check_invariants();
        Ok(())
    }

    // == Set ==
    /// Replaces the value of an existing entry and marks it most recently
    /// used. Fails if the key is absent.
    ///
    /// A growing value evicts other entries from the least recently used end
    /// until the new size fits; the updated entry is never its own victim.
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        let new_size = self.validate_entry(key, &value)?;
        let handle = match self.index.get(key) {
            Some(&handle) => handle,
            None => return Err(CacheError::KeyNotFound(key.to_string())),
        };

        // Touch first: once at the back, eviction reaches this entry only
        // after every other one is gone, and by then the new size fits.
        self.entries.move_to_back(handle);
        let old_size = self.entry(handle).size();

        while !self.accountant.replace(old_size, new_size) {
            debug_assert_ne!(self.entries.front_handle(), Some(handle));
            self.free_front();
        }

        trace!(key = %key, old_bytes = old_size, new_bytes = new_size, "updating entry");
        self.entry_mut(handle).replace_value(value);

        self.debug_check_invariants();
        Ok(())
    }

    // == Delete ==
    /// Removes an entry. Fails if the key is absent.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        let handle = self
            .index
            .remove(key)
            .ok_or_else(|| CacheError::KeyNotFound(key.to_string()))?;

        let entry = match self.entries.remove(handle) {
            Some(entry) => entry,
            None => panic!("internal inconsistency: index holds stale handle for {key:?}"),
        };
        self.accountant.release(entry.size());
        trace!(key = %key, bytes = entry.size(), "deleted entry");

        self.debug_check_invariants();
        Ok(())
    }

    // == Get ==
    /// Returns the value for `key` and marks the entry most recently used.
    ///
    /// The touch relocates the entry in place; its value and byte accounting
    /// are unchanged.
    pub fn get(&mut self, key: &str) -> Result<&str> {
        let handle = match self.index.get(key) {
            Some(&handle) => handle,
            None => {
                self.stats.record_miss();
                return Err(CacheError::KeyNotFound(key.to_string()));
            }
        };

        self.stats.record_hit();
        self.entries.move_to_back(handle);
        trace!(key = %key, "touched entry");
        Ok(self.entry(handle).value())
    }

    // == Peek ==
    /// Returns the value for `key` without touching it or counting a hit.
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .and_then(|&handle| self.entries.get(handle))
            .map(CacheEntry::value)
    }

    /// Checks if a key is present without touching it.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently held by keys and values.
    pub fn current_bytes(&self) -> usize {
        self.accountant.current_bytes()
    }

    pub fn capacity_bytes(&self) -> usize {
        self.accountant.capacity_bytes()
    }

    // == Keys ==
    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(CacheEntry::key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.len(), self.current_bytes());
        stats
    }

    // == Clear ==
    /// Removes every entry. Not counted as evictions.
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
        self.accountant.reset();
        debug!("cache cleared");
    }

    // == Invariants ==
    /// Walks the whole cache and panics if the index, the recency list and
    /// the byte accounting disagree.
    pub fn check_invariants(&self) {
        self.check_counts();

        let mut total = 0;
        for entry in self.entries.iter() {
            total += entry.size();
            let resolved = self
                .index
                .get(entry.key())
                .and_then(|&handle| self.entries.get(handle));
            assert!(
                resolved.map(CacheEntry::key) == Some(entry.key()),
                "internal inconsistency: key {:?} does not resolve to its entry",
                entry.key()
            );
        }
        assert_eq!(
            total,
            self.accountant.current_bytes(),
            "internal inconsistency: accounted bytes differ from stored bytes"
        );
        assert!(
            total <= self.accountant.capacity_bytes(),
            "internal inconsistency: {total} bytes stored over a budget of {}",
            self.accountant.capacity_bytes()
        );
    }

    // == Internal Helpers ==
    /// Rejects entries that could never fit, returning the entry size.
    fn validate_entry(&self, key: &str, value: &str) -> Result<usize> {
        let size = entry_size(key, value);
        let capacity = self.accountant.capacity_bytes();
        if size > capacity {
            debug!(key = %key, bytes = size, capacity, "rejecting oversized entry");
            return Err(CacheError::InvalidEntry { size, capacity });
        }
        Ok(size)
    }

    /// Evicts exactly the least recently used entry.
    fn free_front(&mut self) {
        let victim = match self.entries.pop_front() {
            Some(victim) => victim,
            None => panic!(
                "internal inconsistency: eviction requested from an empty cache ({} bytes accounted)",
                self.accountant.current_bytes()
            ),
        };
        if self.index.remove(victim.key()).is_none() {
            panic!("internal inconsistency: evicted key {:?} was not indexed", victim.key());
        }
        self.accountant.release(victim.size());
        self.stats.record_eviction();
        debug!(key = %victim.key(), bytes = victim.size(), "evicted least recently used entry");
    }

    fn entry(&self, handle: EntryHandle) -> &CacheEntry {
        match self.entries.get(handle) {
            Some(entry) => entry,
            None => panic!("internal inconsistency: index holds a stale handle"),
        }
    }

    fn entry_mut(&mut self, handle: EntryHandle) -> &mut CacheEntry {
        match self.entries.get_mut(handle) {
            Some(entry) => entry,
            None => panic!("internal inconsistency: index holds a stale handle"),
        }
    }

    /// Full walk after every mutation in debug builds.
    fn debug_check_invariants(&self) {
        if cfg!(debug_assertions) {
            self.check_invariants();
        }
    }

    fn check_counts(&self) {
        assert!(
            self.accountant.entry_count() == self.index.len()
                && self.index.len() == self.entries.len(),
            "internal inconsistency: {} accounted entries, {} indexed, {} listed",
            self.accountant.entry_count(),
            self.index.len(),
            self.entries.len()
        );
    }
}
