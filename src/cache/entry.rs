//! Cache Entry Module
//!
//! Defines a single cached response body and the instant it was stored.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A cached value plus its creation instant.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// When the entry was stored (or last overwritten)
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(value: Vec<u8>) -> Self {
        Self::created_at(value, Instant::now())
    }

    /// Creates an entry with an explicit creation instant.
    pub fn created_at(value: Vec<u8>, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    // == Age ==
    /// Returns how old the entry is at `now`.
    ///
    /// Saturates to zero if `now` is before the creation instant.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks whether the entry is older than `interval` at `now`.
    ///
    /// Boundary condition: an entry whose age equals the interval is still
    /// live. It only becomes eligible for removal once its age strictly
    /// exceeds the interval.
    pub fn is_expired_at(&self, now: Instant, interval: Duration) -> bool {
        self.age_at(now) > interval
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_keeps_value() {
        let entry = CacheEntry::new(b"pikachu".to_vec());
        assert_eq!(entry.value, b"pikachu");
    }

    #[test]
    fn test_age_at() {
        let start = Instant::now();
        let entry = CacheEntry::created_at(Vec::new(), start);

        assert_eq!(entry.age_at(start), Duration::ZERO);
        assert_eq!(
            entry.age_at(start + Duration::from_millis(250)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_age_saturates_before_creation() {
        let start = Instant::now();
        let entry = CacheEntry::created_at(Vec::new(), start + Duration::from_secs(1));

        assert_eq!(entry.age_at(start), Duration::ZERO);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let start = Instant::now();
        let interval = Duration::from_secs(5);
        let entry = CacheEntry::created_at(Vec::new(), start);

        assert!(!entry.is_expired_at(start + interval, interval));
        assert!(entry.is_expired_at(start + interval + Duration::from_millis(1), interval));
    }
}
