use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{NewPokemon, Pokemon};

/// Storage capability for cached Pokemon records.
///
/// A store hands out units of work. Every unit of work ends with `commit` or
/// `rollback`, and every coordinator operation that writes does all of its
/// writes inside one of them.
///
/// Handles are exclusively owned by one logical operation and must never be
/// shared across concurrent tasks.
#[async_trait]
pub trait PokemonStore: Send + Sync {
    /// Open a unit of work that holds the store's write lock from its first
    /// statement, so reads inside it can never go stale before a write.
    async fn begin(&self) -> DomainResult<Box<dyn PokemonUnitOfWork>>;

    /// Open a unit of work for lookups only. It takes no write lock.
    async fn begin_read(&self) -> DomainResult<Box<dyn PokemonUnitOfWork>>;
}

/// A transactional session over the `pokemon` table.
///
/// Dropping a unit of work without calling `commit` discards its writes.
#[async_trait]
pub trait PokemonUnitOfWork: Send {
    /// Point lookup by PokeAPI identifier.
    async fn find_by_pokemon_id(&mut self, pokemon_id: i64) -> DomainResult<Option<Pokemon>>;

    /// Exact match on the stored (lower-cased) name.
    ///
    /// If several records share a name, the earliest inserted one wins.
    async fn find_by_name(&mut self, name: &str) -> DomainResult<Option<Pokemon>>;

    /// Total number of stored records.
    async fn count(&mut self) -> DomainResult<u64>;

    /// Records in insertion order, sliced by `offset` and `limit`.
    async fn list(&mut self, offset: u64, limit: u64) -> DomainResult<Vec<Pokemon>>;

    /// Insert a new record.
    ///
    /// # Errors
    /// Returns `DomainError::DuplicatePokemon` if `pokemon_id` is already stored.
    async fn insert(&mut self, record: &NewPokemon) -> DomainResult<Pokemon>;

    /// Overwrite every field of the record with surrogate key `id`.
    ///
    /// `created_at` is preserved and `updated_at` advances.
    async fn update(&mut self, id: i64, record: &NewPokemon) -> DomainResult<Pokemon>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;

    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}
