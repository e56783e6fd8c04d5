//! Test fixtures
//!
//! Seed helpers for the content-store tables. The API itself never writes,
//! so tests insert rows directly, the way the owning CMS would.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

use super::{migrations, DbPool};

/// Fresh in-memory store with the schema applied.
pub async fn setup_pool() -> DbPool {
    let pool = super::create_test_pool()
        .await
        .expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Fixed timestamp so assertions stay deterministic.
pub fn publish_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2012, 6, 1, 10, 0, 0).unwrap()
}

pub async fn insert_photo(pool: &DbPool, title: &str, slug: &str) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO photos (title, description, slug, image, width, height, created, app_data)
        VALUES (?, ?, ?, ?, 800, 600, ?, '{}')
        "#,
    )
    .bind(title)
    .bind(format!("Photo {title}"))
    .bind(slug)
    .bind(format!("photos/{slug}.jpg"))
    .bind(publish_time())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_author(pool: &DbPool, name: &str, slug: &str) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO authors (name, slug, email, description, text)
        VALUES (?, ?, ?, '', '')
        "#,
    )
    .bind(name)
    .bind(slug)
    .bind(format!("{slug}@example.com"))
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_category(pool: &DbPool, title: &str, tree_path: &str) -> Result<i64> {
    let slug = tree_path.rsplit('/').next().unwrap_or(tree_path);
    let result = sqlx::query(
        r#"
        INSERT INTO categories (title, slug, description, template, tree_path, app_data)
        VALUES (?, ?, '', 'category.html', ?, '{}')
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(tree_path)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_user(pool: &DbPool, username: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO users (username) VALUES (?)")
        .bind(username)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_publishable(
    pool: &DbPool,
    title: &str,
    slug: &str,
    category_id: i64,
    photo_id: Option<i64>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO publishables
            (title, slug, description, category_id, photo_id, publish_from, published, announced, is_static, app_data)
        VALUES (?, ?, ?, ?, ?, ?, 1, 0, 0, '{}')
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(format!("About {title}"))
    .bind(category_id)
    .bind(photo_id)
    .bind(publish_time())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn attach_author(pool: &DbPool, publishable_id: i64, author_id: i64) -> Result<()> {
    sqlx::query("INSERT INTO publishable_authors (publishable_id, author_id) VALUES (?, ?)")
        .bind(publishable_id)
        .bind(author_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_listing(pool: &DbPool, publishable_id: i64, commercial: bool) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO listings (publishable_id, publish_from, publish_to, commercial)
        VALUES (?, ?, NULL, ?)
        "#,
    )
    .bind(publishable_id)
    .bind(publish_time())
    .bind(commercial)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_article(pool: &DbPool, publishable_id: i64, content: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO articles (publishable_id, content, created, updated)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(publishable_id)
    .bind(content)
    .bind(publish_time())
    .bind(publish_time())
    .execute(pool)
    .await?;
    Ok(())
}
