//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Reaper: sweeps expired entries out of a cache store every period

mod reaper;

pub use reaper::{spawn_reaper, ReaperHandle, ReaperState};
