//! Cache coordinator for Pokemon records.
//!
//! Implements the read-through pipeline: check local storage, fetch from the
//! remote source on a miss, normalize, and persist. No transaction stays open
//! while the remote source is contacted. All writes of one operation happen in
//! a single write unit of work that commits on success and rolls back on any
//! error.
//!
//! Remote failures of every kind collapse into `Ok(None)`. Storage failures
//! and malformed payloads propagate as `Err`. No retries, no locking across
//! tasks: two concurrent misses on the same id may both fetch, and the second
//! insert then fails with `DomainError::DuplicatePokemon`.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{NewPokemon, Pokemon, RawPokemon};
use crate::domain::ports::{FetchError, PokemonSource, PokemonStore, PokemonUnitOfWork};
use crate::services::normalizer::normalize;

pub struct PokemonService<S: PokemonStore, F: PokemonSource> {
    store: Arc<S>,
    source: Arc<F>,
}

impl<S: PokemonStore, F: PokemonSource> Clone for PokemonService<S, F> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: PokemonStore, F: PokemonSource> PokemonService<S, F> {
    pub fn new(store: Arc<S>, source: Arc<F>) -> Self {
        Self { store, source }
    }

    /// Return the cached record, fetching and storing it on a miss.
    #[instrument(skip(self))]
    pub async fn get_or_fetch(&self, pokemon_id: i64) -> DomainResult<Option<Pokemon>> {
        let mut lookup = self.store.begin_read().await?;
        let cached = lookup.find_by_pokemon_id(pokemon_id).await;
        if let Some(cached) = finish(lookup, cached).await? {
            debug!(pokemon_id, "cache hit");
            return Ok(Some(cached));
        }

        info!(pokemon_id, "cache miss, fetching from remote source");
        let Some(raw) = self.fetch_remote(pokemon_id).await else {
            return Ok(None);
        };
        let record = normalize(raw)?;

        let mut uow = self.store.begin().await?;
        let result = uow.insert(&record).await;
        let stored = finish(uow, result).await?;
        info!(pokemon_id, id = stored.id, name = %stored.name, "cached new record");
        Ok(Some(stored))
    }

    /// Fetch unconditionally and insert or fully overwrite the local record.
    #[instrument(skip(self))]
    pub async fn force_fetch_and_upsert(&self, pokemon_id: i64) -> DomainResult<Option<Pokemon>> {
        let Some(raw) = self.fetch_remote(pokemon_id).await else {
            return Ok(None);
        };
        let record = normalize(raw)?;

        let mut uow = self.store.begin().await?;
        let result = upsert_in(uow.as_mut(), &record).await;
        let stored = finish(uow, result).await?;
        Ok(Some(stored))
    }

    /// One slice of cached records plus the total number stored.
    #[instrument(skip(self))]
    pub async fn list(&self, offset: u64, limit: u64) -> DomainResult<(Vec<Pokemon>, u64)> {
        let mut uow = self.store.begin_read().await?;
        let result = list_in(uow.as_mut(), offset, limit).await;
        finish(uow, result).await
    }

    /// Exact, case-insensitive lookup by name. Never contacts the remote source.
    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> DomainResult<Option<Pokemon>> {
        let mut uow = self.store.begin_read().await?;
        let result = uow.find_by_name(&name.to_lowercase()).await;
        finish(uow, result).await
    }

    async fn fetch_remote(&self, pokemon_id: i64) -> Option<RawPokemon> {
        match self.source.fetch(pokemon_id).await {
            Ok(raw) => Some(raw),
            Err(FetchError::NotFound(_)) => {
                info!(pokemon_id, "remote source has no such pokemon");
                None
            }
            Err(err @ FetchError::Unavailable(_)) => {
                warn!(pokemon_id, error = %err, "remote fetch failed, reporting not found");
                None
            }
        }
    }
}

// Keyed on the payload's id, which is what gets stored.
async fn upsert_in(uow: &mut dyn PokemonUnitOfWork, record: &NewPokemon) -> DomainResult<Pokemon> {
    match uow.find_by_pokemon_id(record.pokemon_id).await? {
        Some(existing) => {
            let updated = uow.update(existing.id, record).await?;
            info!(pokemon_id = record.pokemon_id, id = updated.id, "refreshed cached record");
            Ok(updated)
        }
        None => {
            let inserted = uow.insert(record).await?;
            info!(pokemon_id = record.pokemon_id, id = inserted.id, "cached new record");
            Ok(inserted)
        }
    }
}

async fn list_in(
    uow: &mut dyn PokemonUnitOfWork,
    offset: u64,
    limit: u64,
) -> DomainResult<(Vec<Pokemon>, u64)> {
    let total = uow.count().await?;
    if total == 0 {
        return Ok((Vec::new(), 0));
    }
    let items = uow.list(offset, limit).await?;
    Ok((items, total))
}

/// Commit on success, roll back on error.
async fn finish<T>(uow: Box<dyn PokemonUnitOfWork>, result: DomainResult<T>) -> DomainResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
