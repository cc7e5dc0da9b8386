//! Cache Module
//!
//! Provides a byte-budgeted in-memory cache with LRU eviction.

mod accountant;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use accountant::SizeAccountant;
pub use entry::{entry_size, CacheEntry};
pub use lru::{EntryHandle, Iter as LruIter, LruList};
pub use stats::CacheStats;
pub use store::BoundedLruCache;
