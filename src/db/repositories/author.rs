//! Author repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::{Author, PageParams};
use crate::resource::CompiledFilter;

use super::{bind_filters, where_clause};

const COLUMNS: &str = "id, name, slug, email, description, text";

/// Author repository trait
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<Author>, i64)>;

    async fn get(&self, id: i64) -> Result<Option<Author>>;
}

/// SQLx-based author repository implementation
pub struct SqlxAuthorRepository {
    pool: DbPool,
}

impl SqlxAuthorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn AuthorRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl AuthorRepository for SqlxAuthorRepository {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<Author>, i64)> {
        let where_sql = where_clause(filters);

        let sql = format!("SELECT {COLUMNS} FROM authors{where_sql} ORDER BY id LIMIT ? OFFSET ?");
        let rows = bind_filters(sqlx::query(&sql), filters)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list authors")?;

        let authors = rows.iter().map(row_to_author).collect();

        let count_sql = format!("SELECT COUNT(*) AS count FROM authors{where_sql}");
        let total: i64 = bind_filters(sqlx::query(&count_sql), filters)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count authors")?
            .get("count");

        Ok((authors, total))
    }

    async fn get(&self, id: i64) -> Result<Option<Author>> {
        let sql = format!("SELECT {COLUMNS} FROM authors WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get author by id")?;

        Ok(row.as_ref().map(row_to_author))
    }
}

pub(crate) fn row_to_author(row: &sqlx::sqlite::SqliteRow) -> Author {
    Author {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        email: row.get("email"),
        description: row.get("description"),
        text: row.get("text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use crate::resource::BindValue;

    #[tokio::test]
    async fn list_and_filter_by_slug() {
        let pool = fixtures::setup_pool().await;
        fixtures::insert_author(&pool, "Ann Onymous", "ann").await.unwrap();
        fixtures::insert_author(&pool, "Bob Byline", "bob").await.unwrap();

        let repo = SqlxAuthorRepository::new(pool);
        let (all, total) = repo.list(&[], &PageParams::default()).await.unwrap();
        assert_eq!((all.len(), total), (2, 2));

        let filters = vec![CompiledFilter {
            sql: "slug = ?",
            value: BindValue::Text("bob".to_string()),
        }];
        let (filtered, total) = repo.list(&filters, &PageParams::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(filtered[0].name, "Bob Byline");
    }

    #[tokio::test]
    async fn get_by_id() {
        let pool = fixtures::setup_pool().await;
        let id = fixtures::insert_author(&pool, "Ann", "ann").await.unwrap();

        let repo = SqlxAuthorRepository::new(pool);
        assert_eq!(repo.get(id).await.unwrap().unwrap().email, "ann@example.com");
        assert!(repo.get(12345).await.unwrap().is_none());
    }
}
