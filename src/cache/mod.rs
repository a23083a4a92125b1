//! Cache Module
//!
//! Provides a byte-budgeted cache with least recently used eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::Value;
pub use lru::{RecencyIter, RecencyList};
pub use stats::CacheStats;
pub use store::{EvictionCallback, LruCache};
