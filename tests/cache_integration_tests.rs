//! Integration Tests for the public cache API
//!
//! Drives `LruCache` the way an embedding application would.

use std::sync::{Arc, Mutex, Once};

use byte_lru::{
    CacheConfig, CacheStats, EvictionCallback, LruCache, RecencyIter, RecencyList, Value,
};

// == Helper Functions ==

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "byte_lru=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Value with an explicit byte cost
#[derive(Debug, Clone, PartialEq)]
struct Blob(usize);

impl Value for Blob {
    fn size(&self) -> usize {
        self.0
    }
}

type Log = Arc<Mutex<Vec<(String, usize)>>>;

fn logged_cache(max_bytes: usize) -> (LruCache<Blob>, Log) {
    init_tracing();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let on_evicted: EvictionCallback<Blob> = Box::new(move |key: String, value: Blob| {
        sink.lock().unwrap().push((key, value.0));
    });
    (LruCache::new(max_bytes, Some(on_evicted)), log)
}

fn resident(cache: &LruCache<Blob>) -> Vec<String> {
    cache.keys().map(str::to_string).collect()
}

// == Scenarios ==

#[test]
fn test_unbounded_cache_keeps_everything() {
    let (mut cache, log) = logged_cache(0);

    cache.add("a", Blob(4));
    cache.add("b", Blob(4));
    cache.add("c", Blob(4));

    assert_eq!(cache.len(), 3);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_second_entry_pushes_out_first() {
    init_tracing();
    let mut cache = LruCache::new(10, None);

    cache.add("k1", Blob(8));
    assert_eq!(cache.used_bytes(), 10);

    cache.add("k2", Blob(8));
    assert_eq!(cache.len(), 1);
    assert!(cache.get("k1").is_none());
    assert_eq!(cache.get("k2"), Some(&Blob(8)));
}

#[test]
fn test_recently_read_entry_outlives_older_one() {
    let (mut cache, log) = logged_cache(20);

    cache.add("a", Blob(5));
    cache.add("b", Blob(5));
    assert!(cache.get("a").is_some());
    cache.add("c", Blob(15));

    assert_eq!(log.lock().unwrap()[0], ("b".to_string(), 5));
    assert!(cache.used_bytes() <= 20);
    assert_eq!(resident(&cache), vec!["c"]);
}

#[test]
fn test_replacing_value_applies_size_delta() {
    let (mut cache, log) = logged_cache(100);

    cache.add("key", Blob(10));
    cache.add("other", Blob(10));
    let before = cache.used_bytes();

    cache.add("key", Blob(30));

    assert_eq!(cache.used_bytes(), before + 20);
    assert_eq!(cache.len(), 2);
    assert_eq!(resident(&cache), vec!["key", "other"]);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_remove_oldest_on_empty_cache() {
    let (mut cache, log) = logged_cache(10);

    cache.remove_oldest();
    cache.remove_oldest();

    assert_eq!(cache.len(), 0);
    assert!(log.lock().unwrap().is_empty());
}

// == Eviction Callback ==

#[test]
fn test_callback_receives_each_entry_once_in_lru_order() {
    let (mut cache, log) = logged_cache(0);

    for key in ["a", "b", "c", "d"] {
        cache.add(key, Blob(1));
    }
    cache.get("b");

    while !cache.is_empty() {
        cache.remove_oldest();
    }

    let evicted: Vec<String> = log.lock().unwrap().iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(evicted, vec!["a", "c", "d", "b"]);
    assert_eq!(cache.used_bytes(), 0);
}

#[test]
fn test_callback_gets_ownership_of_value() {
    init_tracing();
    let returned: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&returned);
    let mut cache = LruCache::with_capacity(12)
        .with_on_evicted(move |_key, value: String| sink.lock().unwrap().push(value));

    cache.add("x", "first".to_string());
    cache.add("y", "second".to_string());

    assert_eq!(*returned.lock().unwrap(), vec!["first".to_string()]);
}

#[test]
fn test_oversized_value_is_inserted_then_evicted() {
    let (mut cache, log) = logged_cache(8);

    cache.add("small", Blob(1));
    cache.add("huge", Blob(64));

    assert!(cache.is_empty());
    assert_eq!(
        *log.lock().unwrap(),
        vec![("small".to_string(), 1), ("huge".to_string(), 64)]
    );
}

#[test]
fn test_sizes_up_to_usize_max() {
    let (mut bounded, log) = logged_cache(10);
    bounded.add("a", Blob(usize::MAX));

    assert!(bounded.is_empty());
    assert_eq!(bounded.used_bytes(), 0);
    assert_eq!(*log.lock().unwrap(), vec![("a".to_string(), usize::MAX)]);

    let (mut unbounded, log) = logged_cache(0);
    unbounded.add("a", Blob(usize::MAX / 2));
    unbounded.add("b", Blob(usize::MAX / 2));

    assert_eq!(unbounded.len(), 2);
    assert_eq!(unbounded.used_bytes(), 2 * (1 + (usize::MAX / 2) as u128));
    assert!(usize::try_from(unbounded.used_bytes()).is_err());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_update_by_borrowed_key() {
    let (mut cache, _log) = logged_cache(0);
    let owned = String::from("key");

    cache.add(&owned, Blob(1));
    cache.add("key", Blob(5));
    cache.add(owned, Blob(3));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.used_bytes(), 3 + 3);
    assert_eq!(cache.peek("key"), Some(&Blob(3)));
}

// == Recency List ==

#[test]
fn test_recency_iter_is_nameable() {
    let mut list = RecencyList::new();
    list.push_front(1);
    list.push_front(2);

    let iter: RecencyIter<'_, i32> = list.iter();
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.copied().collect::<Vec<_>>(), vec![2, 1]);
}

// == Value Types ==

#[test]
fn test_byte_vector_values() {
    let mut cache: LruCache<Vec<u8>> = LruCache::with_capacity(16);

    cache.add("a", vec![0; 7]);
    cache.add("b", vec![0; 7]);

    assert_eq!(cache.used_bytes(), 16);
    cache.add("c", vec![0; 1]);
    assert_eq!(cache.peek_oldest().map(|(k, _)| k), Some("b"));
}

#[test]
fn test_shared_values() {
    let mut cache: LruCache<Arc<str>> = LruCache::unbounded();
    let shared: Arc<str> = Arc::from("payload");

    cache.add("p", Arc::clone(&shared));

    assert_eq!(cache.used_bytes(), 1 + 7);
    assert_eq!(Arc::strong_count(&shared), 2);
    assert_eq!(cache.get("p").map(|v| &**v), Some("payload"));
}

// == Configuration and Stats ==

#[test]
fn test_cache_from_config() {
    init_tracing();
    let config: CacheConfig = serde_json::from_str(r#"{"max_bytes": 6}"#).unwrap();
    let mut cache: LruCache<String> = LruCache::from_config(&config);

    cache.add("a", "12".to_string());
    cache.add("b", "34".to_string());
    cache.add("c", "56".to_string());

    assert_eq!(cache.max_bytes(), 6);
    assert_eq!(cache.len(), 2);
    assert!(!cache.contains("a"));
}

#[test]
fn test_config_defaults_to_unbounded() {
    let config: CacheConfig = serde_json::from_str("{}").unwrap();
    assert!(config.is_unbounded());
}

#[test]
fn test_stats_serialize() {
    let (mut cache, _log) = logged_cache(5);

    cache.add("a", Blob(2));
    cache.get("a");
    cache.get("zz");
    cache.add("b", Blob(2));

    let stats: CacheStats = cache.stats();
    assert_eq!(stats.hit_rate(), 0.5);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["evictions"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["total_bytes"], 3);
}

// == External Synchronization ==

#[test]
fn test_shared_behind_mutex() {
    let cache: Arc<Mutex<LruCache<Vec<u8>>>> = Arc::new(Mutex::new(LruCache::with_capacity(64)));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..50 {
                    let mut guard = cache.lock().unwrap();
                    guard.add(format!("{t}-{i}"), vec![0; 4]);
                    assert!(guard.used_bytes() <= 64);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let guard = cache.lock().unwrap();
    assert!(guard.used_bytes() <= 64);
    assert!(!guard.is_empty());
}
