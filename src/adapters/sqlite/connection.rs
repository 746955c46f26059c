//! SQLite pool construction for the record cache.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::DatabaseConfig;

const IN_MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to create database directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open database: {0}")]
    Open(#[source] sqlx::Error),

    #[error("Database did not answer a ping: {0}")]
    Ping(#[source] sqlx::Error),
}

/// Pool sizing and statement logging.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    /// Log every statement at debug level.
    pub log_statements: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(3),
            log_statements: false,
        }
    }
}

impl From<&DatabaseConfig> for PoolConfig {
    fn from(database: &DatabaseConfig) -> Self {
        Self {
            max_connections: database.max_connections,
            min_connections: warm_connections(database.max_connections),
            log_statements: database.echo,
            ..Self::default()
        }
    }
}

/// Keep one connection open unless the pool is capped below that.
fn warm_connections(max_connections: u32) -> u32 {
    1.min(max_connections)
}

/// Open a pool on a file (or `:memory:`) database.
///
/// The parent directory of a file database is created on demand. Connections
/// use WAL journaling, enforce foreign keys, and wait up to 30s on a busy lock.
pub async fn create_pool(database_url: &str, config: Option<PoolConfig>) -> Result<SqlitePool, ConnectionError> {
    let config = config.unwrap_or_default();

    if let Some(dir) = database_file(database_url).and_then(|file| file.parent().map(PathBuf::from)) {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(&dir)
                .map_err(|source| ConnectionError::CreateDirectory { path: dir.clone(), source })?;
        }
    }

    let options = connect_options(database_url, config.log_statements)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(ConnectionError::Open)
}

/// A private in-memory database behind a single connection.
///
/// Every call yields an isolated database. With one connection, concurrent
/// units of work queue behind each other.
pub async fn create_test_pool() -> Result<SqlitePool, ConnectionError> {
    let options = connect_options(IN_MEMORY_URL, false)?.shared_cache(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(ConnectionError::Open)
}

pub async fn verify_connection(pool: &SqlitePool) -> Result<(), ConnectionError> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(ConnectionError::Ping)?;
    Ok(())
}

fn connect_options(database_url: &str, log_statements: bool) -> Result<SqliteConnectOptions, ConnectionError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|_| ConnectionError::InvalidUrl(database_url.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    // sqlx logs statements at debug level unless told otherwise.
    Ok(if log_statements {
        options
    } else {
        options.disable_statement_logging()
    })
}

/// The on-disk file behind a `sqlite:` URL, or `None` for in-memory databases.
fn database_file(database_url: &str) -> Option<PathBuf> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
