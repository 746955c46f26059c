use sqlx::SqlitePool;
use tempfile::TempDir;

use dexcache::adapters::sqlite::{create_migrated_test_pool, initialize_database, PoolConfig};

/// Create an in-memory SQLite database for testing
///
/// Each call creates a completely isolated database instance with the
/// schema already applied.
pub async fn setup_test_db() -> SqlitePool {
    create_migrated_test_pool()
        .await
        .expect("failed to create test database")
}

/// Create a file-backed SQLite database behind the production pool settings.
///
/// Unlike `setup_test_db`, the pool has several connections, so units of work
/// from concurrent tasks really overlap. Keep the `TempDir` alive for as long
/// as the pool is in use.
pub async fn setup_file_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("dexcache.db").display());
    let pool = initialize_database(&url, PoolConfig::default())
        .await
        .expect("failed to create file database");
    (dir, pool)
}

/// Closes the connection pool.
pub async fn teardown_test_db(pool: SqlitePool) {
    pool.close().await;
}

/// Number of rows in the pokemon table, bypassing the coordinator.
pub async fn row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM pokemon")
        .fetch_one(pool)
        .await
        .expect("failed to count rows")
}
