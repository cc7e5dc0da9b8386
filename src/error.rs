//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
///
/// Every variant is an ordinary, caller-visible outcome. Disagreement between
/// the index, the recency list and the byte accounting is a defect and panics
/// instead of surfacing here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key plus value can never fit, regardless of eviction
    #[error("Entry of {size} bytes exceeds cache capacity of {capacity} bytes")]
    InvalidEntry { size: usize, capacity: usize },

    /// Key not present in the cache
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Key already present (insert-only operation)
    #[error("Key already exists: {0}")]
    KeyAlreadyExists(String),

    /// Rejected configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
