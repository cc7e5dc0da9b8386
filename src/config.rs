//! Configuration Module
//!
//! Handles loading the cache configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Default byte budget when nothing is configured.
pub const DEFAULT_CAPACITY_BYTES: usize = 1024;

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum total bytes (keys + values) the cache may hold
    pub capacity_bytes: usize,
}

impl CacheConfig {
    /// Creates a config with an explicit byte budget.
    pub fn new(capacity_bytes: usize) -> Self {
        Self { capacity_bytes }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY_BYTES` - Byte budget (default: 1024)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            capacity_bytes: env::var("CACHE_CAPACITY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY_BYTES),
        }
    }

    /// Rejects a zero budget, which could never hold any entry.
    pub fn validate(&self) -> Result<()> {
        if self.capacity_bytes == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity_bytes, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env() {
        env::remove_var("CACHE_CAPACITY_BYTES");
        assert_eq!(CacheConfig::from_env().capacity_bytes, DEFAULT_CAPACITY_BYTES);

        env::set_var("CACHE_CAPACITY_BYTES", "4096");
        assert_eq!(CacheConfig::from_env().capacity_bytes, 4096);

        env::set_var("CACHE_CAPACITY_BYTES", "not-a-number");
        assert_eq!(CacheConfig::from_env().capacity_bytes, DEFAULT_CAPACITY_BYTES);

        env::remove_var("CACHE_CAPACITY_BYTES");
    }

    #[test]
    fn test_config_zero_capacity_rejected() {
        let result = CacheConfig::new(0).validate();
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }
}
