//! Cache Handle Module
//!
//! Thread-safe, cloneable front end to a [`CacheStore`] with its reaper.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheConfig, CacheStats, CacheStore};
use crate::error::Result;
use crate::tasks::{spawn_reaper, ReaperHandle, ReaperState};

/// Locks the store, recovering the map if a previous holder panicked.
///
/// Every store operation leaves the map consistent before it can panic, so a
/// poisoned lock still guards valid data.
pub(crate) fn lock_store(store: &Mutex<CacheStore>) -> MutexGuard<'_, CacheStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Cache ==
/// Time-expiring response cache shared between callers.
///
/// Clones share the same map and reaper. The reaper stops when
/// [`shutdown`](Cache::shutdown) is called or the last clone is dropped.
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<Mutex<CacheStore>>,
    reaper: Arc<ReaperHandle>,
    config: CacheConfig,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache whose entries expire after `interval`.
    ///
    /// The reap period is `interval` truncated to whole seconds.
    ///
    /// # Errors
    /// `InvalidConfiguration` for a zero or sub-second interval, `NoRuntime`
    /// outside a tokio runtime.
    pub fn new(interval: Duration) -> Result<Self> {
        Self::with_config(CacheConfig::new(interval))
    }

    /// Creates a cache from a full configuration and starts its reaper.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(Mutex::new(CacheStore::new(config.interval())));
        let reaper = spawn_reaper(Arc::downgrade(&store), config.reap_period())?;
        debug!(
            "Cache created with interval {:?}, reap period {:?}",
            config.interval(),
            config.reap_period()
        );

        Ok(Self {
            store,
            reaper: Arc::new(reaper),
            config,
        })
    }

    // == Get ==
    /// Returns a copy of the bytes cached under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        lock_store(&self.store).get(key)
    }

    // == Put ==
    /// Caches `value` under `key`, replacing any previous entry and
    /// resetting its age.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let (key, value) = (key.into(), value.into());
        lock_store(&self.store).put(key, value);
    }

    // == Lifecycle ==
    /// Stops the reaper without waiting for it to exit.
    ///
    /// Entries already cached remain readable; they are just no longer swept.
    pub fn stop(&self) {
        self.reaper.stop();
    }

    /// Stops the reaper and waits for its task to finish.
    pub async fn shutdown(&self) {
        self.reaper.shutdown().await;
        debug!("Cache reaper shut down");
    }

    /// Returns whether the reaper is still sweeping.
    pub fn reaper_state(&self) -> ReaperState {
        self.reaper.state()
    }

    // == Introspection ==
    /// Returns the validated configuration this cache was built with.
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        lock_store(&self.store).stats()
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        lock_store(&self.store).len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        lock_store(&self.store).is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn fast_cache(interval_ms: u64, period_ms: u64) -> Cache {
        let config = CacheConfig::new(Duration::from_millis(interval_ms))
            .with_reap_period(Duration::from_millis(period_ms));
        Cache::with_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_cache_put_and_get() {
        let cache = Cache::new(Duration::from_secs(60)).unwrap();

        cache.put("https://pokeapi.co/api/v2/location-area/", b"page".to_vec());

        assert_eq!(
            cache.get("https://pokeapi.co/api/v2/location-area/"),
            Some(b"page".to_vec())
        );
        assert_eq!(cache.len(), 1);
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = Cache::new(Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("never-inserted"), None);
        assert_eq!(cache.stats().misses, 1);
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = Cache::new(Duration::from_secs(60)).unwrap();
        let other = cache.clone();

        other.put("shared", "value");

        assert_eq!(cache.get("shared"), Some(b"value".to_vec()));
        cache.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_concrete_expiry_scenario() {
        // Sweeps at 75ms and 150ms.
        let cache = fast_cache(100, 75);
        cache.put("a", "x");

        assert_eq!(cache.get("a"), Some(b"x".to_vec()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get("a"), Some(b"x".to_vec()));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(cache.get("a"), None);

        cache.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_resets_age() {
        let cache = fast_cache(100, 10);
        cache.put("k", "v1");

        tokio::time::sleep(Duration::from_millis(60)).await;
        cache.put("k", "v2");

        // 130ms after the first put, 70ms after the second.
        tokio::time::sleep(Duration::from_millis(70)).await;
        assert_eq!(cache.get("k"), Some(b"v2".to_vec()));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.get("k"), None);

        cache.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_present_before_interval_absent_after_period() {
        let cache = fast_cache(300, 200);
        cache.put("k", "v");

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(cache.get("k"), Some(b"v".to_vec()));

        // interval + period + epsilon
        tokio::time::sleep(Duration::from_millis(202)).await;
        assert_eq!(cache.get("k"), None);

        cache.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_cache_keeps_entries() {
        let cache = fast_cache(100, 100);
        cache.put("k", "v");
        cache.shutdown().await;

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(cache.reaper_state(), ReaperState::Stopped);
        assert_eq!(cache.get("k"), Some(b"v".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_keeps_entries_readable() {
        let cache = fast_cache(100, 50);
        cache.put("k", "v");
        assert_eq!(cache.reaper_state(), ReaperState::Running);

        cache.stop();
        assert_eq!(cache.reaper_state(), ReaperState::Stopped);

        // Well past interval + period; nothing sweeps any more.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(cache.get("k"), Some(b"v".to_vec()));
        assert_eq!(cache.stats().reaped, 0);

        cache.put("k", "v2");
        assert_eq!(cache.get("k"), Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn test_invalid_intervals_rejected() {
        assert!(matches!(
            Cache::new(Duration::ZERO),
            Err(CacheError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Cache::new(Duration::from_millis(100)),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_cache_outside_runtime_fails() {
        assert!(matches!(
            Cache::new(Duration::from_secs(5)),
            Err(CacheError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_many_caches_shut_down_cleanly() {
        let mut caches = Vec::new();
        for _ in 0..50 {
            caches.push(Cache::new(Duration::from_secs(1)).unwrap());
        }
        for cache in &caches {
            cache.shutdown().await;
            assert_eq!(cache.reaper_state(), ReaperState::Stopped);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_put_and_get() {
        let cache = Cache::new(Duration::from_secs(60)).unwrap();
        let mut tasks = Vec::new();

        for worker in 0..8 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..200 {
                    let own = format!("worker-{}-{}", worker, i);
                    cache.put(own.clone(), own.clone().into_bytes());
                    assert_eq!(cache.get(&own), Some(own.into_bytes()));

                    cache.put("shared", format!("{}", worker).into_bytes());
                    let shared = cache.get("shared").expect("shared key present");
                    let shared = String::from_utf8(shared).unwrap();
                    assert!(shared.parse::<u32>().unwrap() < 8);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(cache.len(), 8 * 200 + 1);
        cache.shutdown().await;
    }
}
