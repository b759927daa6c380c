//! Error types for the pokedex
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised when building a cache.
///
/// Reads and writes on a live cache never fail; a miss is `None`, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Interval or reap period is zero, negative or otherwise unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The reaper needs a tokio runtime to be spawned on
    #[error("No tokio runtime available to spawn the reaper on")]
    NoRuntime,
}

// == Api Error Enum ==
/// Errors raised by the PokeAPI fetch layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport level failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status
    #[error("API returned non-2XX status for {url}: {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Response body was not the JSON we expected
    #[error("Failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A resource name that cannot be used as a single URL path segment
    #[error("Invalid resource name: {0:?}")]
    InvalidName(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;
