//! Pokedex - explore the Pokemon world from your terminal
//!
//! Interactive REPL over the PokeAPI with a time-expiring response cache.

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex::cli::Cli;
use pokedex::repl::spawn_stdin_reader;
use pokedex::{Cache, Config, PokeApi, Repl};

/// Main entry point for the pokedex.
///
/// # Startup Sequence
/// 1. Parse CLI flags and load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Create the response cache, which starts its reaper
/// 4. Run the REPL on stdin/stdout until `exit`, EOF or Ctrl+C
/// 5. Shut the reaper down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()
        .context("invalid environment configuration")?
        .with_cli(&cli);

    // Defaults to "info" level (or "debug" with -v), can be overridden with RUST_LOG env var.
    // Logs go to stderr to keep the REPL output clean.
    let default_filter = if config.verbose {
        "pokedex=debug"
    } else {
        "pokedex=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Startup sequence begin: {:?}", config);

    let cache_config = config
        .cache_config()
        .context("invalid cache configuration")?;
    let cache = Cache::with_config(cache_config).context("failed to create response cache")?;
    info!(
        "Response cache initialized: interval={:?}, reap_period={:?}",
        cache.config().interval(),
        cache.config().reap_period()
    );

    let api = PokeApi::new(config.api_base_url.clone(), cache.clone());
    let mut repl = Repl::new(api, StdRng::from_entropy());

    println!("Starting pokedex cli...\nType 'help' for more information");
    let stdin = spawn_stdin_reader().context("failed to start stdin reader")?;
    let mut stdout = std::io::stdout();

    // On a signal the REPL future, and with it the stdin channel, is dropped.
    // The reader thread may still be parked in a read; it does not keep the
    // process alive.
    let result = tokio::select! {
        result = repl.run(stdin, &mut stdout) => result,
        _ = shutdown_signal() => Ok(()),
    };

    cache.shutdown().await;
    let stats = cache.stats();
    debug!(
        "Cache statistics: hits={}, misses={}, reaped={}, entries={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.reaped,
        stats.total_entries,
        stats.hit_rate()
    );

    result
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
