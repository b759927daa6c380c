//! Cache Store Module
//!
//! The unsynchronized map behind a [`Cache`](super::Cache). All locking lives
//! in the handle; this type only knows about entries and their age.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Response bodies keyed by request URL.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Lookup and sweep counters
    stats: CacheStats,
    /// Maximum entry age before a sweep drops it
    interval: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries expire after `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            interval,
        }
    }

    // == Put ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// Overwriting resets the entry's age.
    pub fn put(&mut self, key: String, value: Vec<u8>) {
        self.put_at(key, value, Instant::now());
    }

    /// Stores `value` under `key` as if written at `now`.
    pub fn put_at(&mut self, key: String, value: Vec<u8>, now: Instant) {
        self.entries.insert(key, CacheEntry::created_at(value, now));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    ///
    /// Presence in the map is the only criterion: an entry past its interval
    /// that has not been swept yet is still returned. Reading never extends
    /// an entry's life.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Sweep ==
    /// Removes every entry older than the interval at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_at(&mut self, now: Instant) -> usize {
        let interval = self.interval;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_expired_at(now, interval));
        let removed = before - self.entries.len();

        self.stats.record_reaped(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Removes every entry that is expired right now.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Instant::now())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Introspection ==
    /// Returns the maximum age an entry survives a sweep with.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Checks presence without counting a hit or miss.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
