//! dexcache - read-through cache for PokeAPI Pokemon records
//!
//! Requests for a Pokemon are served from a local SQLite table; on a miss the
//! record is fetched from PokeAPI, normalized into a flat shape, stored, and
//! returned. A forced refresh overwrites the stored record in place.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Records, errors and the storage/source ports
//! - **Service Layer** (`services`): Normalizer and cache coordinator
//! - **Adapters** (`adapters`): SQLite store, PokeAPI client, HTTP API
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dexcache::{ConfigLoader, PokeApiClient, PokemonService, SqlitePokemonStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let pool = dexcache::adapters::sqlite::initialize_database(
//!         &config.database.url,
//!         Default::default(),
//!     )
//!     .await?;
//!     let service = PokemonService::new(
//!         Arc::new(SqlitePokemonStore::new(pool)),
//!         Arc::new(PokeApiClient::new(&config.pokeapi)?),
//!     );
//!     let pikachu = service.get_or_fetch(25).await?;
//!     println!("{pikachu:?}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::pokeapi::PokeApiClient;
pub use adapters::sqlite::SqlitePokemonStore;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Config, DatabaseConfig, LoggingConfig, NewPokemon, PageRequest, PokeApiConfig, Pokemon,
    PokemonPage, RawPokemon, ServerConfig,
};
pub use domain::ports::{FetchError, PokemonSource, PokemonStore, PokemonUnitOfWork};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::LoggerImpl;
pub use services::{normalize, PokemonService};
