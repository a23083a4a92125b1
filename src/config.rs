//! Configuration Module
//!
//! Handles loading the cache budget from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Environment variable holding the byte budget.
pub const MAX_BYTES_VAR: &str = "LRU_MAX_BYTES";

/// Cache configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum total bytes (key lengths plus value sizes); 0 = unbounded
    #[serde(default)]
    pub max_bytes: usize,
}

impl CacheConfig {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_MAX_BYTES` - Byte budget (default: 0, unbounded)
    ///
    /// An unset variable falls back to the default; a set but unparseable
    /// one is an error.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            max_bytes: parse_var(MAX_BYTES_VAR, env::var(MAX_BYTES_VAR).ok())?
                .unwrap_or_default(),
        })
    }

    /// Returns true if this configuration never evicts.
    pub fn is_unbounded(&self) -> bool {
        self.max_bytes == 0
    }
}

fn parse_var(var: &str, raw: Option<String>) -> Result<Option<usize>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig {
                var: var.to_string(),
                value,
            }),
    }
}
