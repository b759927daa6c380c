//! Cache Configuration Module
//!
//! Validated interval and reap period for a cache instance.

use std::time::Duration;

use crate::error::{CacheError, Result};

// == Cache Config ==
/// Expiry interval plus the period of the background sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    interval: Duration,
    reap_period: Option<Duration>,
}

impl CacheConfig {
    // == Constructor ==
    /// Creates a config whose reap period is derived from `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            reap_period: None,
        }
    }

    /// Builds a config from signed millisecond values.
    ///
    /// Zero and negative values are rejected here, before they can reach a
    /// timer.
    pub fn from_millis(interval_ms: i64, reap_period_ms: Option<i64>) -> Result<Self> {
        let interval = positive_millis("interval", interval_ms)?;
        let mut config = Self::new(interval);
        if let Some(period_ms) = reap_period_ms {
            config = config.with_reap_period(positive_millis("reap period", period_ms)?);
        }
        config.validate()?;
        Ok(config)
    }

    // == Builder ==
    /// Overrides the derived reap period.
    pub fn with_reap_period(mut self, period: Duration) -> Self {
        self.reap_period = Some(period);
        self
    }

    // == Accessors ==
    /// Maximum age an entry may reach before a sweep removes it.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time between two sweeps.
    ///
    /// Unless set explicitly this is the interval truncated to whole seconds,
    /// which is zero for sub-second intervals. `validate` rejects that case.
    pub fn reap_period(&self) -> Duration {
        self.reap_period
            .unwrap_or_else(|| Duration::from_secs(self.interval.as_secs()))
    }

    // == Validate ==
    /// Checks that both the interval and the effective reap period are positive.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(CacheError::InvalidConfiguration(
                "cache interval must be positive".to_string(),
            ));
        }

        if self.reap_period().is_zero() {
            let msg = match self.reap_period {
                Some(_) => "reap period must be positive".to_string(),
                None => format!(
                    "cache interval {:?} truncates to a zero reap period; \
                     use at least one second or set an explicit reap period",
                    self.interval
                ),
            };
            return Err(CacheError::InvalidConfiguration(msg));
        }

        Ok(())
    }
}

fn positive_millis(what: &str, value: i64) -> Result<Duration> {
    if value <= 0 {
        return Err(CacheError::InvalidConfiguration(format!(
            "{} must be positive, got {}ms",
            what, value
        )));
    }
    Ok(Duration::from_millis(value as u64))
}
