//! Category repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::{Category, PageParams};
use crate::resource::CompiledFilter;

use super::{bind_filters, parse_app_data, where_clause};

const COLUMNS: &str = "id, title, slug, description, template, tree_path, app_data";

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<Category>, i64)>;

    async fn get(&self, id: i64) -> Result<Option<Category>>;
}

/// SQLx-based category repository implementation
pub struct SqlxCategoryRepository {
    pool: DbPool,
}

impl SqlxCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<Category>, i64)> {
        let where_sql = where_clause(filters);

        // tree order: parents sort before their descendants
        let sql = format!(
            "SELECT {COLUMNS} FROM categories{where_sql} ORDER BY tree_path LIMIT ? OFFSET ?"
        );
        let rows = bind_filters(sqlx::query(&sql), filters)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")?;

        let categories = rows.iter().map(row_to_category).collect();

        let count_sql = format!("SELECT COUNT(*) AS count FROM categories{where_sql}");
        let total: i64 = bind_filters(sqlx::query(&count_sql), filters)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count categories")?
            .get("count");

        Ok((categories, total))
    }

    async fn get(&self, id: i64) -> Result<Option<Category>> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get category by id")?;

        Ok(row.as_ref().map(row_to_category))
    }
}

pub(crate) fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        template: row.get("template"),
        tree_path: row.get("tree_path"),
        app_data: parse_app_data(row.get("app_data")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use crate::resource::BindValue;

    #[tokio::test]
    async fn list_orders_by_tree_path() {
        let pool = fixtures::setup_pool().await;
        fixtures::insert_category(&pool, "Movies", "culture/movies").await.unwrap();
        fixtures::insert_category(&pool, "Culture", "culture").await.unwrap();
        fixtures::insert_category(&pool, "Books", "culture/books").await.unwrap();

        let repo = SqlxCategoryRepository::new(pool);
        let (categories, total) = repo.list(&[], &PageParams::default()).await.unwrap();

        assert_eq!(total, 3);
        let paths: Vec<&str> = categories.iter().map(|c| c.tree_path.as_str()).collect();
        assert_eq!(paths, vec!["culture", "culture/books", "culture/movies"]);
    }

    #[tokio::test]
    async fn filter_by_tree_path() {
        let pool = fixtures::setup_pool().await;
        fixtures::insert_category(&pool, "Culture", "culture").await.unwrap();
        fixtures::insert_category(&pool, "Sport", "sport").await.unwrap();

        let repo = SqlxCategoryRepository::new(pool);
        let filters = vec![CompiledFilter {
            sql: "tree_path = ?",
            value: BindValue::Text("sport".to_string()),
        }];
        let (categories, total) = repo.list(&filters, &PageParams::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(categories[0].title, "Sport");
    }

    #[tokio::test]
    async fn get_by_id() {
        let pool = fixtures::setup_pool().await;
        let id = fixtures::insert_category(&pool, "Culture", "culture").await.unwrap();

        let repo = SqlxCategoryRepository::new(pool);
        assert_eq!(repo.get(id).await.unwrap().unwrap().slug, "culture");
        assert!(repo.get(999).await.unwrap().is_none());
    }
}
