//! Pokedex - explore the Pokemon world from your terminal
//!
//! PokeAPI responses are memoized in a time-expiring cache whose background
//! reaper drops entries once they outlive the configured interval.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repl;
pub mod tasks;

pub use api::PokeApi;
pub use cache::{Cache, CacheConfig};
pub use config::Config;
pub use error::{ApiError, CacheError};
pub use repl::Repl;
