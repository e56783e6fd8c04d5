//! Photo repository
//!
//! Read-only access to the `photos` table. List queries accept compiled
//! equality filters whose predicates are written against the bare column
//! names of this table.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::{PageParams, Photo};
use crate::resource::CompiledFilter;

use super::{bind_filters, parse_app_data, where_clause};

const COLUMNS: &str = "id, title, description, slug, image, width, height, \
     important_top, important_left, important_right, important_bottom, created, app_data";

/// Photo repository trait
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// List photos matching the filters, with the unpaged total.
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<Photo>, i64)>;

    /// Get a photo by id.
    async fn get(&self, id: i64) -> Result<Option<Photo>>;
}

/// SQLx-based photo repository implementation
pub struct SqlxPhotoRepository {
    pool: DbPool,
}

impl SqlxPhotoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn PhotoRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PhotoRepository for SqlxPhotoRepository {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<Photo>, i64)> {
        let where_sql = where_clause(filters);

        let sql = format!("SELECT {COLUMNS} FROM photos{where_sql} ORDER BY id LIMIT ? OFFSET ?");
        let query = bind_filters(sqlx::query(&sql), filters)
            .bind(page.limit())
            .bind(page.offset());
        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list photos")?;

        let mut photos = Vec::with_capacity(rows.len());
        for row in &rows {
            photos.push(row_to_photo(row)?);
        }

        let count_sql = format!("SELECT COUNT(*) AS count FROM photos{where_sql}");
        let total: i64 = bind_filters(sqlx::query(&count_sql), filters)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count photos")?
            .get("count");

        Ok((photos, total))
    }

    async fn get(&self, id: i64) -> Result<Option<Photo>> {
        let sql = format!("SELECT {COLUMNS} FROM photos WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get photo by id")?;

        match row {
            Some(row) => Ok(Some(row_to_photo(&row)?)),
            None => Ok(None),
        }
    }
}

pub(crate) fn row_to_photo(row: &sqlx::sqlite::SqliteRow) -> Result<Photo> {
    Ok(Photo {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        slug: row.get("slug"),
        image: row.get("image"),
        width: row.get("width"),
        height: row.get("height"),
        important_top: row.get("important_top"),
        important_left: row.get("important_left"),
        important_right: row.get("important_right"),
        important_bottom: row.get("important_bottom"),
        created: row.get("created"),
        app_data: parse_app_data(row.get("app_data")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use crate::resource::BindValue;

    #[tokio::test]
    async fn list_returns_all_photos_with_total() {
        let pool = fixtures::setup_pool().await;
        fixtures::insert_photo(&pool, "First", "first").await.unwrap();
        fixtures::insert_photo(&pool, "Second", "second").await.unwrap();

        let repo = SqlxPhotoRepository::new(pool);
        let (photos, total) = repo
            .list(&[], &PageParams::default())
            .await
            .expect("Failed to list photos");

        assert_eq!(photos.len(), 2);
        assert_eq!(total, 2);
        assert_eq!(photos[0].title, "First");
        assert_eq!(photos[0].app_data, serde_json::json!({}));
    }

    #[tokio::test]
    async fn equality_filter_restricts_the_result() {
        let pool = fixtures::setup_pool().await;
        fixtures::insert_photo(&pool, "Sunrise", "sunrise").await.unwrap();
        fixtures::insert_photo(&pool, "Sunset", "sunset").await.unwrap();

        let repo = SqlxPhotoRepository::new(pool);
        let filters = vec![CompiledFilter {
            sql: "title = ?",
            value: BindValue::Text("Sunset".to_string()),
        }];
        let (photos, total) = repo
            .list(&filters, &PageParams::default())
            .await
            .expect("Failed to list photos");

        assert_eq!(total, 1);
        assert_eq!(photos[0].slug, "sunset");
    }

    #[tokio::test]
    async fn paging_windows_the_result_but_not_the_total() {
        let pool = fixtures::setup_pool().await;
        for i in 0..5 {
            fixtures::insert_photo(&pool, &format!("P{i}"), &format!("p{i}"))
                .await
                .unwrap();
        }

        let repo = SqlxPhotoRepository::new(pool);
        let (photos, total) = repo
            .list(&[], &PageParams::new(2, 2))
            .await
            .expect("Failed to list photos");

        assert_eq!(photos.len(), 2);
        assert_eq!(total, 5);
        assert_eq!(photos[0].title, "P2");
    }

    #[tokio::test]
    async fn get_by_id() {
        let pool = fixtures::setup_pool().await;
        let id = fixtures::insert_photo(&pool, "Only", "only").await.unwrap();

        let repo = SqlxPhotoRepository::new(pool);
        let photo = repo.get(id).await.expect("Failed to get photo").unwrap();
        assert_eq!(photo.image, "photos/only.jpg");

        assert!(repo.get(99999).await.expect("Failed to get photo").is_none());
    }
}
