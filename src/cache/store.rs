//! Cache Store Module
//!
//! Main cache engine combining a key index with the recency list and a
//! running byte total.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::cache::entry::Entry;
use crate::cache::{CacheStats, RecencyList, Value};
use crate::config::CacheConfig;

/// Callback invoked with the key and value of every evicted entry.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

// == LRU Cache ==
/// Byte-budgeted cache with least recently used eviction.
///
/// Every entry costs `key.len() + value.size()` bytes. After each
/// [`add`](Self::add), entries are evicted from the least recently used end
/// until the total fits within `max_bytes`. A budget of zero never evicts.
///
/// The running total is a `u128`, so summing sizes up to `usize::MAX` per
/// entry cannot overflow.
///
/// No internal locking; wrap it in a `Mutex` to share it between threads.
pub struct LruCache<V> {
    /// Key to recency list handle; shares the key allocation with the entry
    index: HashMap<Arc<str>, usize>,
    /// Resident entries, most recently used first
    order: RecencyList<Entry<V>>,
    /// Sum of entry costs
    used_bytes: u128,
    /// Byte budget, 0 = unbounded
    max_bytes: usize,
    /// Called once per evicted entry, after it is detached
    on_evicted: Option<EvictionCallback<V>>,
    /// Lookup and eviction counters
    stats: CacheStats,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates a new cache with a byte budget and optional eviction callback.
    ///
    /// # Arguments
    /// * `max_bytes` - Maximum total cost; 0 means unbounded
    /// * `on_evicted` - Receives each evicted key and value
    pub fn new(max_bytes: usize, on_evicted: Option<EvictionCallback<V>>) -> Self {
        Self {
            index: HashMap::new(),
            order: RecencyList::new(),
            used_bytes: 0,
            max_bytes,
            on_evicted,
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache that never evicts on its own.
    pub fn unbounded() -> Self {
        Self::new(0, None)
    }

    /// Creates a cache with a byte budget and no eviction callback.
    pub fn with_capacity(max_bytes: usize) -> Self {
        Self::new(max_bytes, None)
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        info!(max_bytes = config.max_bytes, "Creating LRU cache");
        Self::new(config.max_bytes, None)
    }

    /// Installs the eviction callback, replacing any previous one.
    pub fn with_on_evicted<F>(mut self, on_evicted: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(on_evicted));
        self
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// Returns None on a miss; a miss leaves the ordering untouched.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        match self.index.get(key).copied() {
            Some(handle) => {
                self.promote(handle, key);
                self.stats.record_hit();
                Some(&self.entry(handle, key).value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Add ==
    /// Inserts or replaces a value and marks it most recently used.
    ///
    /// Replacing a value adjusts the byte total by the size difference only
    /// and does not allocate. If the total then exceeds the budget, the least
    /// recently used entries are evicted. An entry that alone exceeds the
    /// budget is inserted and then evicted straight away.
    pub fn add(&mut self, key: impl AsRef<str>, value: V) {
        let key = key.as_ref();

        if let Some(handle) = self.index.get(key).copied() {
            self.promote(handle, key);

            let (old_size, new_size) = {
                let entry = self.entry_mut(handle, key);
                let old = std::mem::replace(&mut entry.value, value);
                (old.size(), entry.value.size())
            };
            self.used_bytes = self.used_bytes - old_size as u128 + new_size as u128;
            trace!(key, old_size, new_size, "Updated cache entry");
        } else {
            let shared: Arc<str> = Arc::from(key);
            let entry = Entry::new(Arc::clone(&shared), value);
            let cost = entry.cost();
            let handle = self.order.push_front(entry);
            self.index.insert(shared, handle);
            self.used_bytes += cost;
            trace!(key, cost, "Inserted cache entry");
        }

        while self.max_bytes != 0
            && self.used_bytes > self.max_bytes as u128
            && !self.order.is_empty()
        {
            self.remove_oldest();
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry.
    ///
    /// The entry is removed from the list and the index and the byte total
    /// is updated before the eviction callback runs. No-op when empty.
    pub fn remove_oldest(&mut self) {
        let Some(entry) = self.order.pop_back() else {
            return;
        };
        if self.index.remove(&*entry.key).is_none() {
            unreachable!("evicted key {:?} missing from index", entry.key);
        }

        let cost = entry.cost();
        self.used_bytes -= cost;
        self.stats.record_eviction();
        debug!(
            key = %entry.key,
            freed_bytes = cost,
            used_bytes = self.used_bytes,
            "Evicted oldest cache entry"
        );

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(entry.key.to_string(), entry.value);
        }
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the total cost of resident entries.
    pub fn used_bytes(&self) -> u128 {
        self.used_bytes
    }

    /// Returns the byte budget; 0 means unbounded.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    // == Peek ==
    /// Checks whether a key is resident without touching its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Retrieves a value without marking it used or counting a lookup.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.index
            .get(key)
            .map(|&handle| &self.entry(handle, key).value)
    }

    /// Returns the entry that `remove_oldest` would evict next.
    pub fn peek_oldest(&self) -> Option<(&str, &V)> {
        self.order
            .back()
            .map(|entry| (&*entry.key, &entry.value))
    }

    /// Iterates resident keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(|entry| &*entry.key)
    }

    // == Stats ==
    /// Returns a snapshot of the counters with live totals filled in.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_totals(self.len(), self.used_bytes);
        stats
    }

    fn promote(&mut self, handle: usize, key: &str) {
        let moved = self.order.move_to_front(handle);
        debug_assert!(moved, "index maps {key:?} to free slot {handle}");
    }

    fn entry(&self, handle: usize, key: &str) -> &Entry<V> {
        match self.order.get(handle) {
            Some(entry) => entry,
            None => unreachable!("index maps {key:?} to free slot {handle}"),
        }
    }

    fn entry_mut(&mut self, handle: usize, key: &str) -> &mut Entry<V> {
        match self.order.get_mut(handle) {
            Some(entry) => entry,
            None => unreachable!("index maps {key:?} to free slot {handle}"),
        }
    }

    /// Panics unless index, list and byte total agree.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        let listed: Vec<&str> = self.keys().collect();
        let unique: HashSet<&str> = listed.iter().copied().collect();
        assert_eq!(listed.len(), unique.len(), "duplicate keys in recency list");
        assert_eq!(listed.len(), self.index.len(), "index and list sizes differ");
        for key in &listed {
            let handle = match self.index.get(*key) {
                Some(&handle) => handle,
                None => panic!("{key:?} missing from index"),
            };
            assert_eq!(
                self.order.get(handle).map(|entry| &*entry.key),
                Some(*key),
                "index handle for {key:?} points at another node"
            );
        }

        let recomputed: u128 = self.order.iter().map(Entry::cost).sum();
        assert_eq!(recomputed, self.used_bytes, "byte total drifted");
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.order.len())
            .field("used_bytes", &self.used_bytes)
            .field("max_bytes", &self.max_bytes)
            .field("has_on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}
