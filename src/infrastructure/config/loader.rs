use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Primary project config file.
pub const CONFIG_FILE: &str = "dexcache.yaml";

/// Optional local overrides, not meant to be committed.
pub const LOCAL_CONFIG_FILE: &str = "dexcache.local.yaml";

/// Prefix for environment overrides, nested keys split on `__`.
pub const ENV_PREFIX: &str = "DEXCACHE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Database url cannot be empty")]
    EmptyDatabaseUrl,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid port: {0}. Must be non-zero")]
    InvalidPort(u16),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid PokeAPI base url: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. dexcache.yaml (project config)
    /// 3. dexcache.local.yaml (local overrides, optional)
    /// 4. Environment variables (DEXCACHE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment(None)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }

        let config: Config = Self::figment(Some(path))
            .extract()
            .context(format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The provider chain. An explicit file replaces the two project files.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let figment = match config_file {
            Some(path) => figment.merge(Yaml::file(path)),
            None => figment
                .merge(Yaml::file(CONFIG_FILE))
                .merge(Yaml::file(LOCAL_CONFIG_FILE)),
        };

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        if config.database.url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let pokeapi = &config.pokeapi;
        if !(pokeapi.base_url.starts_with("http://") || pokeapi.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(pokeapi.base_url.clone()));
        }

        if pokeapi.requests_per_second <= 0.0 || !pokeapi.requests_per_second.is_finite() {
            return Err(ConfigError::InvalidRateLimit(pokeapi.requests_per_second));
        }

        if pokeapi.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(pokeapi.burst_size));
        }

        if pokeapi.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(pokeapi.timeout_secs));
        }

        Ok(())
    }
}
