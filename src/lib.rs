//! Byte LRU - A byte-budgeted in-memory cache
//!
//! Evicts the least recently used entry whenever the total byte cost of
//! resident entries exceeds the configured budget.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, EvictionCallback, LruCache, RecencyIter, RecencyList, Value};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
