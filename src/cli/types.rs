//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dexcache")]
#[command(about = "dexcache - read-through cache for PokeAPI Pokemon records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of dexcache.yaml
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Apply pending database migrations
    Migrate,

    /// Show a Pokemon, fetching it from PokeAPI on a cache miss
    Get {
        /// PokeAPI numeric id
        pokemon_id: i64,
    },

    /// Refresh a Pokemon from PokeAPI, overwriting the cached record
    Fetch {
        /// PokeAPI numeric id
        pokemon_id: i64,
    },

    /// List cached Pokemon in insertion order
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Records per page (at most 100)
        #[arg(short, long, default_value = "10")]
        size: u32,
    },

    /// Look up a cached Pokemon by name (case-insensitive, local only)
    Search {
        /// Pokemon name
        name: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Override the configured bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the configured port
    #[arg(short, long)]
    pub port: Option<u16>,
}
