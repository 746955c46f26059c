//! Process-wide wiring shared by every CLI command.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::adapters::pokeapi::PokeApiClient;
use crate::adapters::sqlite::{initialize_database, PoolConfig, SqlitePokemonStore};
use crate::domain::models::Config;
use crate::services::PokemonService;

/// The coordinator as wired for production use.
pub type AppPokemonService = PokemonService<SqlitePokemonStore, PokeApiClient>;

/// Database pool and coordinator, created once at startup.
pub struct AppContext {
    pub pool: SqlitePool,
    pub service: AppPokemonService,
}

impl AppContext {
    /// Open the pool, apply migrations, and build the coordinator.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = initialize_database(&config.database.url, PoolConfig::from(&config.database))
            .await
            .context("Failed to initialize database")?;

        let client =
            PokeApiClient::new(&config.pokeapi).context("Failed to build PokeAPI client")?;

        info!(
            database = %config.database.url,
            pokeapi = %client.base_url(),
            "dexcache initialized"
        );

        let service = PokemonService::new(
            Arc::new(SqlitePokemonStore::new(pool.clone())),
            Arc::new(client),
        );

        Ok(Self { pool, service })
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
