//! SQLite implementation of the PokemonStore.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewPokemon, Pokemon};
use crate::domain::ports::{PokemonStore, PokemonUnitOfWork};

#[derive(Clone)]
pub struct SqlitePokemonStore {
    pool: SqlitePool,
}

impl SqlitePokemonStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PokemonStore for SqlitePokemonStore {
    async fn begin(&self) -> DomainResult<Box<dyn PokemonUnitOfWork>> {
        // A deferred transaction that read first cannot upgrade to a writer
        // once another connection has committed (SQLITE_BUSY_SNAPSHOT), and
        // busy_timeout does not retry that. IMMEDIATE takes the lock up front.
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(Box::new(SqliteUnitOfWork { tx }))
    }

    async fn begin_read(&self) -> DomainResult<Box<dyn PokemonUnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteUnitOfWork { tx }))
    }
}

/// A unit of work backed by one SQLite transaction.
///
/// sqlx rolls the transaction back when it is dropped uncommitted.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl PokemonUnitOfWork for SqliteUnitOfWork {
    async fn find_by_pokemon_id(&mut self, pokemon_id: i64) -> DomainResult<Option<Pokemon>> {
        let row: Option<PokemonRow> = sqlx::query_as("SELECT * FROM pokemon WHERE pokemon_id = ?")
            .bind(pokemon_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_name(&mut self, name: &str) -> DomainResult<Option<Pokemon>> {
        let row: Option<PokemonRow> =
            sqlx::query_as("SELECT * FROM pokemon WHERE name = ? ORDER BY id ASC LIMIT 1")
                .bind(name)
                .fetch_optional(&mut *self.tx)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn count(&mut self) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pokemon")
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn list(&mut self, offset: u64, limit: u64) -> DomainResult<Vec<Pokemon>> {
        let rows: Vec<PokemonRow> =
            sqlx::query_as("SELECT * FROM pokemon ORDER BY id ASC LIMIT ? OFFSET ?")
                .bind(to_sql_int(limit))
                .bind(to_sql_int(offset))
                .fetch_all(&mut *self.tx)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert(&mut self, record: &NewPokemon) -> DomainResult<Pokemon> {
        let now = Utc::now().to_rfc3339();

        let row: PokemonRow = sqlx::query_as(
            r#"INSERT INTO pokemon (pokemon_id, name, height, weight, base_experience,
               types, abilities, stats, sprite_front, sprite_back, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(record.pokemon_id)
        .bind(&record.name)
        .bind(record.height)
        .bind(record.weight)
        .bind(record.base_experience)
        .bind(serde_json::to_string(&record.types)?)
        .bind(serde_json::to_string(&record.abilities)?)
        .bind(serde_json::to_string(&record.stats)?)
        .bind(&record.sprite_front)
        .bind(&record.sprite_back)
        .bind(&now)
        .bind(&now)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, record.pokemon_id))?;

        row.try_into()
    }

    async fn update(&mut self, id: i64, record: &NewPokemon) -> DomainResult<Pokemon> {
        let row: Option<PokemonRow> = sqlx::query_as(
            r#"UPDATE pokemon SET pokemon_id = ?, name = ?, height = ?, weight = ?,
               base_experience = ?, types = ?, abilities = ?, stats = ?,
               sprite_front = ?, sprite_back = ?, updated_at = ?
               WHERE id = ?
               RETURNING *"#,
        )
        .bind(record.pokemon_id)
        .bind(&record.name)
        .bind(record.height)
        .bind(record.weight)
        .bind(record.base_experience)
        .bind(serde_json::to_string(&record.types)?)
        .bind(serde_json::to_string(&record.abilities)?)
        .bind(serde_json::to_string(&record.stats)?)
        .bind(&record.sprite_front)
        .bind(&record.sprite_back)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, record.pokemon_id))?;

        row.ok_or(DomainError::PokemonRecordMissing(id))?.try_into()
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn map_write_error(err: sqlx::Error, pokemon_id: i64) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::DuplicatePokemon(pokemon_id)
        }
        _ => err.into(),
    }
}

#[derive(sqlx::FromRow)]
struct PokemonRow {
    id: i64,
    pokemon_id: i64,
    name: String,
    height: f64,
    weight: f64,
    base_experience: i64,
    types: String,
    abilities: String,
    stats: String,
    sprite_front: Option<String>,
    sprite_back: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PokemonRow> for Pokemon {
    type Error = DomainError;

    fn try_from(row: PokemonRow) -> Result<Self, Self::Error> {
        Ok(Pokemon {
            id: row.id,
            pokemon_id: row.pokemon_id,
            name: row.name,
            height: row.height,
            weight: row.weight,
            base_experience: row.base_experience,
            types: serde_json::from_str(&row.types)?,
            abilities: serde_json::from_str(&row.abilities)?,
            stats: serde_json::from_str(&row.stats)?,
            sprite_front: row.sprite_front,
            sprite_back: row.sprite_back,
            created_at: super::parse_datetime(&row.created_at)?,
            updated_at: super::parse_datetime(&row.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, initialize_database, PoolConfig};

    async fn setup_test_store() -> SqlitePokemonStore {
        let pool = create_migrated_test_pool().await.unwrap();
        SqlitePokemonStore::new(pool)
    }

    fn bulbasaur() -> NewPokemon {
        NewPokemon::new(1, "bulbasaur")
            .with_types(["grass", "poison"])
            .with_stat("hp", 45)
            .with_stat("attack", 49)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = setup_test_store().await;

        let mut uow = store.begin().await.unwrap();
        let stored = uow.insert(&bulbasaur()).await.unwrap();
        uow.commit().await.unwrap();

        assert!(stored.id > 0);
        assert_eq!(stored.created_at, stored.updated_at);

        let mut uow = store.begin().await.unwrap();
        let found = uow.find_by_pokemon_id(1).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert_eq!(found.types, vec!["grass", "poison"]);
        assert_eq!(found.stats["attack"], 49);
        assert_eq!(found.stats.keys().collect::<Vec<_>>(), vec!["hp", "attack"]);
        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = setup_test_store().await;

        let mut uow = store.begin().await.unwrap();
        assert!(uow.find_by_pokemon_id(404).await.unwrap().is_none());
        assert!(uow.find_by_name("missingno").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let store = setup_test_store().await;

        let mut uow = store.begin().await.unwrap();
        uow.insert(&bulbasaur()).await.unwrap();
        let err = uow.insert(&bulbasaur()).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicatePokemon(1)));
    }

    #[tokio::test]
    async fn test_update_overwrites_and_preserves_identity() {
        let store = setup_test_store().await;

        let mut uow = store.begin().await.unwrap();
        let original = uow.insert(&bulbasaur()).await.unwrap();
        uow.commit().await.unwrap();

        let mut replacement = NewPokemon::new(1, "bulbasaur").with_types(["grass"]);
        replacement.sprite_front = Some("https://x/new.png".to_string());

        let mut uow = store.begin().await.unwrap();
        let updated = uow.update(original.id, &replacement).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        assert_eq!(updated.types, vec!["grass"]);
        assert!(updated.stats.is_empty());
        assert_eq!(updated.sprite_front.as_deref(), Some("https://x/new.png"));
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let store = setup_test_store().await;

        let mut uow = store.begin().await.unwrap();
        let err = uow.update(999, &bulbasaur()).await.unwrap_err();
        assert!(matches!(err, DomainError::PokemonRecordMissing(999)));
    }

    #[tokio::test]
    async fn test_drop_without_commit_discards_writes() {
        let store = setup_test_store().await;

        {
            let mut uow = store.begin().await.unwrap();
            uow.insert(&bulbasaur()).await.unwrap();
        }

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let store = setup_test_store().await;

        let mut uow = store.begin().await.unwrap();
        uow.insert(&bulbasaur()).await.unwrap();
        uow.rollback().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert!(uow.find_by_pokemon_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_unit_runs_beside_open_writer() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("cache.db").display());
        let pool = initialize_database(&url, PoolConfig::default()).await.unwrap();
        let store = SqlitePokemonStore::new(pool.clone());

        let mut writer = store.begin().await.unwrap();
        writer.insert(&bulbasaur()).await.unwrap();

        let mut reader = store.begin_read().await.unwrap();
        assert_eq!(reader.count().await.unwrap(), 0, "uncommitted row must stay invisible");
        reader.commit().await.unwrap();

        writer.commit().await.unwrap();

        let mut reader = store.begin_read().await.unwrap();
        assert_eq!(reader.count().await.unwrap(), 1);
        reader.commit().await.unwrap();

        pool.close().await;
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let store = setup_test_store().await;

        let mut uow = store.begin().await.unwrap();
        for (id, name) in [(4, "charmander"), (1, "bulbasaur"), (7, "squirtle")] {
            uow.insert(&NewPokemon::new(id, name)).await.unwrap();
        }
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.count().await.unwrap(), 3);

        let all = uow.list(0, 10).await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["charmander", "bulbasaur", "squirtle"]);

        let slice = uow.list(1, 1).await.unwrap();
        assert_eq!(slice.len(), 1);
        assert_eq!(slice[0].name, "bulbasaur");

        assert!(uow.list(10, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_name_prefers_earliest() {
        let store = setup_test_store().await;

        let mut uow = store.begin().await.unwrap();
        let first = uow.insert(&NewPokemon::new(10, "unknown")).await.unwrap();
        uow.insert(&NewPokemon::new(11, "unknown")).await.unwrap();

        let found = uow.find_by_name("unknown").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.pokemon_id, 10);
    }
}
