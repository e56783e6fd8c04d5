//! Database migrations
//!
//! Code-based migrations for the content-store schema, embedded in the
//! binary. Each migration has a unique version and is applied at most once;
//! applied versions are tracked in the `_migrations` table.

use anyhow::{Context, Result};
use sqlx::Row;

use super::DbPool;

/// A schema migration.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Unique version number, applied in ascending order
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements, separated by `;`
    pub up: &'static str,
}

/// All migrations for the content-store schema.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_photos",
        up: r#"
            CREATE TABLE IF NOT EXISTS photos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                slug VARCHAR(255) NOT NULL,
                image VARCHAR(255) NOT NULL,
                width INTEGER NOT NULL DEFAULT 0,
                height INTEGER NOT NULL DEFAULT 0,
                important_top INTEGER,
                important_left INTEGER,
                important_right INTEGER,
                important_bottom INTEGER,
                created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                app_data TEXT NOT NULL DEFAULT '{}'
            );
            CREATE INDEX IF NOT EXISTS idx_photos_slug ON photos(slug);
        "#,
    },
    Migration {
        version: 2,
        name: "create_authors",
        up: r#"
            CREATE TABLE IF NOT EXISTS authors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                text TEXT NOT NULL DEFAULT ''
            );
        "#,
    },
    Migration {
        version: 3,
        name: "create_categories",
        up: r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                template VARCHAR(100) NOT NULL DEFAULT 'category.html',
                tree_path VARCHAR(255) NOT NULL,
                app_data TEXT NOT NULL DEFAULT '{}'
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_tree_path ON categories(tree_path);
        "#,
    },
    Migration {
        version: 4,
        name: "create_users",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username VARCHAR(150) NOT NULL UNIQUE
            );
        "#,
    },
    Migration {
        version: 5,
        name: "create_publishables",
        up: r#"
            CREATE TABLE IF NOT EXISTS publishables (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category_id INTEGER NOT NULL,
                photo_id INTEGER,
                publish_from TIMESTAMP NOT NULL,
                publish_to TIMESTAMP,
                published BOOLEAN NOT NULL DEFAULT 0,
                announced BOOLEAN NOT NULL DEFAULT 0,
                is_static BOOLEAN NOT NULL DEFAULT 0,
                app_data TEXT NOT NULL DEFAULT '{}',
                FOREIGN KEY (category_id) REFERENCES categories(id),
                FOREIGN KEY (photo_id) REFERENCES photos(id)
            );
            CREATE INDEX IF NOT EXISTS idx_publishables_category ON publishables(category_id);
            CREATE INDEX IF NOT EXISTS idx_publishables_slug ON publishables(slug);
            CREATE TABLE IF NOT EXISTS publishable_authors (
                publishable_id INTEGER NOT NULL,
                author_id INTEGER NOT NULL,
                PRIMARY KEY (publishable_id, author_id),
                FOREIGN KEY (publishable_id) REFERENCES publishables(id) ON DELETE CASCADE,
                FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 6,
        name: "create_listings",
        up: r#"
            CREATE TABLE IF NOT EXISTS listings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                publishable_id INTEGER NOT NULL,
                publish_from TIMESTAMP NOT NULL,
                publish_to TIMESTAMP,
                commercial BOOLEAN NOT NULL DEFAULT 0,
                FOREIGN KEY (publishable_id) REFERENCES publishables(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_listings_publishable ON listings(publishable_id);
        "#,
    },
    Migration {
        version: 7,
        name: "create_articles",
        up: r#"
            CREATE TABLE IF NOT EXISTS articles (
                publishable_id INTEGER PRIMARY KEY,
                content TEXT NOT NULL DEFAULT '',
                created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (publishable_id) REFERENCES publishables(id) ON DELETE CASCADE
            );
        "#,
    },
];

/// Apply every pending migration. Returns how many were applied.
pub async fn run_migrations(pool: &DbPool) -> Result<usize> {
    create_migrations_table(pool).await?;
    let applied = applied_versions(pool).await?;

    let mut count = 0;
    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }
        tracing::info!("Applying migration {}: {}", migration.version, migration.name);
        apply_migration(pool, migration)
            .await
            .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
        count += 1;
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

async fn create_migrations_table(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migrations table")?;
    Ok(())
}

async fn applied_versions(pool: &DbPool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|row| row.get("version")).collect())
}

async fn apply_migration(pool: &DbPool, migration: &Migration) -> Result<()> {
    // sqlx executes one statement per query call
    for statement in migration.up.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to execute: {}", &statement[..statement.len().min(80)]))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}
