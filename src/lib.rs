//! Byte LRU - A byte-budgeted in-memory key-value cache
//!
//! Keeps the total size of keys and values under a fixed budget, evicting
//! least recently used entries to make room.

pub mod cache;
pub mod config;
pub mod error;
pub mod replay;
pub mod storage;

pub use cache::BoundedLruCache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use storage::Storage;
