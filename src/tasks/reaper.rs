//! Cache Reaper Task
//!
//! Background task that periodically sweeps entries older than the cache
//! interval out of a [`CacheStore`].

use std::sync::{Mutex, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{lock_store, CacheStore};
use crate::error::{CacheError, Result};

// == Reaper State ==
/// Lifecycle of a reaper. `Running -> Stopped` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaperState {
    Running,
    Stopped,
}

// == Reaper Handle ==
/// Owns the cancellation signal and join handle of one reaper task.
///
/// Dropping the handle stops the reaper.
#[derive(Debug)]
pub struct ReaperHandle {
    token: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReaperHandle {
    /// Returns the current lifecycle state.
    pub fn state(&self) -> ReaperState {
        if self.token.is_cancelled() {
            ReaperState::Stopped
        } else {
            ReaperState::Running
        }
    }

    /// Signals the reaper to stop without waiting for it.
    ///
    /// Any sweep that has not yet taken the store lock becomes a no-op.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Signals the reaper to stop and waits for the task to exit.
    pub async fn shutdown(&self) {
        self.stop();

        let task = self
            .task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!("Cache reaper exited abnormally: {}", err);
            }
        }
    }

    /// Returns true once the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawns the reaper for `store` on the current tokio runtime.
///
/// The first sweep happens one `period` after spawning. The task holds only a
/// weak reference, so it also exits once the store itself has been dropped.
///
/// # Errors
/// `CacheError::InvalidConfiguration` for a zero period and
/// `CacheError::NoRuntime` when called outside a tokio runtime.
pub fn spawn_reaper(store: Weak<Mutex<CacheStore>>, period: Duration) -> Result<ReaperHandle> {
    if period.is_zero() {
        return Err(CacheError::InvalidConfiguration(
            "reap period must be positive".to_string(),
        ));
    }
    let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

    let token = CancellationToken::new();
    let task = runtime.spawn(run(store, period, token.clone()));

    Ok(ReaperHandle {
        token,
        task: Mutex::new(Some(task)),
    })
}

async fn run(store: Weak<Mutex<CacheStore>>, period: Duration, token: CancellationToken) {
    debug!("Starting cache reaper with period of {:?}", period);

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(live) = store.upgrade() else {
            break;
        };

        match sweep(&live, &token) {
            Some(0) => debug!("Cache sweep: no expired entries found"),
            Some(removed) => info!("Cache sweep: removed {} expired entries", removed),
            None => break,
        }
    }

    debug!("Cache reaper stopped");
}

/// Runs one sweep under the store lock.
///
/// Returns `None` without touching the store if the reaper was cancelled.
fn sweep(store: &Mutex<CacheStore>, token: &CancellationToken) -> Option<usize> {
    let mut guard = lock_store(store);
    if token.is_cancelled() {
        return None;
    }
    Some(guard.sweep())
}
