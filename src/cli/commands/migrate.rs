use anyhow::{Context, Result};

use crate::adapters::sqlite::{create_pool, Migrator, PoolConfig};
use crate::cli::output::print_json;
use crate::domain::models::DatabaseConfig;

/// Handle migrate command
pub async fn execute(database: &DatabaseConfig, json: bool) -> Result<()> {
    let pool = create_pool(&database.url, Some(PoolConfig::from(database)))
        .await
        .context("Failed to open database")?;

    let migrator = Migrator::new(pool.clone());
    let result = async {
        let applied = migrator
            .apply_pending()
            .await
            .context("Failed to run database migrations")?;
        let version = migrator
            .current_version()
            .await
            .context("Failed to read schema version")?;
        anyhow::Ok((applied, version))
    }
    .await;
    pool.close().await;
    let (applied, version) = result?;

    if json {
        print_json(&serde_json::json!({
            "applied": applied,
            "schema_version": version,
        }))?;
    } else if applied == 0 {
        println!("Database schema is up to date (version {version})");
    } else {
        println!("Applied {applied} migration(s); schema is now at version {version}");
    }

    Ok(())
}
