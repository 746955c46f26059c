//! Embedded schema migrations, tracked in `schema_migrations`.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to apply migration {version}: {source}")]
    Apply {
        version: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("Failed to read schema version: {0}")]
    Version(#[source] sqlx::Error),
}

/// One forward-only schema step compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: &'static str,
}

/// Every schema step, in ascending version order.
pub const EMBEDDED_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Create pokemon table",
    sql: include_str!("../../../migrations/001_create_pokemon.sql"),
}];

pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply every embedded migration newer than the recorded schema version.
    ///
    /// Returns the number of migrations applied.
    pub async fn apply_pending(&self) -> Result<usize, MigrationError> {
        self.apply(EMBEDDED_MIGRATIONS).await
    }

    /// Apply the given migrations that are newer than the recorded version.
    pub async fn apply(&self, migrations: &[Migration]) -> Result<usize, MigrationError> {
        self.ensure_version_table().await?;
        let current = self.current_version().await?;

        let mut pending: Vec<&Migration> = migrations.iter().filter(|m| m.version > current).collect();
        pending.sort_by_key(|m| m.version);

        for migration in &pending {
            self.apply_one(migration).await?;
            info!(version = migration.version, description = migration.description, "applied migration");
        }

        Ok(pending.len())
    }

    /// Highest applied version, 0 on a fresh database.
    pub async fn current_version(&self) -> Result<i64, MigrationError> {
        self.ensure_version_table().await?;
        let (version,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(MigrationError::Version)?;
        Ok(version)
    }

    async fn ensure_version_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(MigrationError::Version)?;
        Ok(())
    }

    /// Schema change and version row commit together.
    async fn apply_one(&self, migration: &Migration) -> Result<(), MigrationError> {
        let failed = |source| MigrationError::Apply { version: migration.version, source };

        let mut tx = self.pool.begin().await.map_err(failed)?;
        sqlx::raw_sql(migration.sql).execute(&mut *tx).await.map_err(failed)?;
        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        tx.commit().await.map_err(failed)
    }
}
