use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::RawPokemon;

/// Why a remote fetch produced no payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The remote source confirmed the identifier does not exist.
    #[error("Pokemon {0} does not exist upstream")]
    NotFound(i64),

    /// Timeout, connection failure, unexpected status or undecodable body.
    #[error("Remote source unavailable: {0}")]
    Unavailable(String),
}

/// Remote-fetch capability for raw Pokemon payloads.
#[async_trait]
pub trait PokemonSource: Send + Sync {
    async fn fetch(&self, pokemon_id: i64) -> Result<RawPokemon, FetchError>;
}
