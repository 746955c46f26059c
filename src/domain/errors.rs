//! Domain errors for the dexcache service.

use thiserror::Error;

/// Domain-level errors that can occur while serving cached records.
///
/// Remote-source failures never appear here: the coordinator absorbs them
/// into a `None` outcome. Everything in this enum is fatal for the current
/// operation and rolls back its unit of work.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Pokemon {0} is already cached")]
    DuplicatePokemon(i64),

    #[error("Cached record {0} disappeared during update")]
    PokemonRecordMissing(i64),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
