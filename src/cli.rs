//! Command-line interface parsing for the pokedex
//!
//! Flags override the matching `POKEDEX_*` environment variables.

use clap::Parser;

/// Pokedex - explore the Pokemon world from your terminal
#[derive(Parser, Debug, Default)]
#[command(name = "pokedex")]
#[command(about = "A Pokedex REPL backed by the PokeAPI")]
#[command(version)]
pub struct Cli {
    /// Display debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// How long API responses stay cached, in milliseconds
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    pub cache_interval_ms: Option<i64>,

    /// Time between cache sweeps, in milliseconds
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    pub reap_period_ms: Option<i64>,

    /// Base URL of the PokeAPI
    #[arg(long, value_name = "URL")]
    pub api_base_url: Option<String>,
}
