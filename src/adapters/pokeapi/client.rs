//! HTTP client for the PokeAPI `/pokemon` endpoint.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::domain::models::{PokeApiConfig, RawPokemon};
use crate::domain::ports::{FetchError, PokemonSource};

#[derive(Debug, Error)]
pub enum PokeApiClientError {
    #[error("Invalid PokeAPI configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// PokeAPI client implementing [`PokemonSource`].
///
/// A 404 maps to [`FetchError::NotFound`]; every other failure (timeout,
/// connection error, unexpected status, undecodable body) maps to
/// [`FetchError::Unavailable`]. Requests are never retried.
#[derive(Clone)]
pub struct PokeApiClient {
    http: Client,
    base_url: String,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl std::fmt::Debug for PokeApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokeApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PokeApiClient {
    pub fn new(config: &PokeApiConfig) -> Result<Self, PokeApiClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(build_rate_limiter(config)?),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn pokemon_url(&self, pokemon_id: i64) -> String {
        format!("{}/pokemon/{}", self.base_url, pokemon_id)
    }
}

fn build_rate_limiter(config: &PokeApiConfig) -> Result<DefaultDirectRateLimiter, PokeApiClientError> {
    if !(config.requests_per_second.is_finite() && config.requests_per_second > 0.0) {
        return Err(PokeApiClientError::InvalidConfig(format!(
            "requests_per_second must be positive, got {}",
            config.requests_per_second
        )));
    }
    let burst = NonZeroU32::new(config.burst_size).ok_or_else(|| {
        PokeApiClientError::InvalidConfig("burst_size must be at least 1".to_string())
    })?;
    let period = Duration::try_from_secs_f64(1.0 / config.requests_per_second).map_err(|_| {
        PokeApiClientError::InvalidConfig(format!(
            "requests_per_second is too small, got {}",
            config.requests_per_second
        ))
    })?;
    let quota = Quota::with_period(period)
        .ok_or_else(|| {
            PokeApiClientError::InvalidConfig("requests_per_second is too large".to_string())
        })?
        .allow_burst(burst);

    Ok(RateLimiter::direct(quota))
}

#[async_trait]
impl PokemonSource for PokeApiClient {
    async fn fetch(&self, pokemon_id: i64) -> Result<RawPokemon, FetchError> {
        self.rate_limiter.until_ready().await;

        let url = self.pokemon_url(pokemon_id);
        debug!(%url, "fetching pokemon from PokeAPI");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(format!("PokeAPI request failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(pokemon_id));
        }
        if !status.is_success() {
            return Err(FetchError::Unavailable(format!(
                "PokeAPI returned {status} for pokemon {pokemon_id}"
            )));
        }

        resp.json::<RawPokemon>()
            .await
            .map_err(|e| FetchError::Unavailable(format!("PokeAPI body decode failed: {e}")))
    }
}
