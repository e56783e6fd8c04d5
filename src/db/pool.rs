//! Database connection pool
//!
//! The content store is a single SQLite file (or `:memory:` for tests).
//! Foreign keys are switched on per pool; the parent directory is created
//! on first use so a fresh checkout can start the server directly.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Pool handle shared across repositories.
pub type DbPool = SqlitePool;

/// Open a connection pool for the configured store.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let url = connection_url(&config.url)?;

    let pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&url)
        .await
        .with_context(|| format!("Failed to open content store: {}", config.url))?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .context("Failed to enable foreign keys")?;

    Ok(pool)
}

/// In-memory pool for tests.
pub async fn create_test_pool() -> Result<DbPool> {
    create_pool(&DatabaseConfig {
        url: ":memory:".to_string(),
    })
    .await
}

fn connection_url(raw: &str) -> Result<String> {
    if raw == ":memory:" || raw == "sqlite::memory:" {
        return Ok("sqlite::memory:".to_string());
    }

    let path = raw.strip_prefix("sqlite:").unwrap_or(raw);
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }
    }

    if raw.contains('?') {
        Ok(format!("sqlite:{path}"))
    } else {
        Ok(format!("sqlite:{path}?mode=rwc"))
    }
}
