//! Error types for the cache
//!
//! Cache operations themselves never fail: a miss is `None`. Errors only
//! come from surfaces around the cache, such as loading configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An environment variable was set but could not be parsed
    #[error("Invalid config: {var}={value:?} is not a valid byte count")]
    InvalidConfig { var: String, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
