//! Listing repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::{Listing, PageParams};
use crate::resource::CompiledFilter;

use super::{bind_filters, where_clause};

const COLUMNS: &str = "id, publishable_id, publish_from, publish_to, commercial";

/// Listing repository trait
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<Listing>, i64)>;

    async fn get(&self, id: i64) -> Result<Option<Listing>>;
}

/// SQLx-based listing repository implementation
pub struct SqlxListingRepository {
    pool: DbPool,
}

impl SqlxListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn ListingRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ListingRepository for SqlxListingRepository {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<Listing>, i64)> {
        let where_sql = where_clause(filters);

        let sql = format!("SELECT {COLUMNS} FROM listings{where_sql} ORDER BY id LIMIT ? OFFSET ?");
        let rows = bind_filters(sqlx::query(&sql), filters)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list listings")?;

        let listings = rows.iter().map(row_to_listing).collect();

        let count_sql = format!("SELECT COUNT(*) AS count FROM listings{where_sql}");
        let total: i64 = bind_filters(sqlx::query(&count_sql), filters)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count listings")?
            .get("count");

        Ok((listings, total))
    }

    async fn get(&self, id: i64) -> Result<Option<Listing>> {
        let sql = format!("SELECT {COLUMNS} FROM listings WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get listing by id")?;

        Ok(row.as_ref().map(row_to_listing))
    }
}

pub(crate) fn row_to_listing(row: &sqlx::sqlite::SqliteRow) -> Listing {
    Listing {
        id: row.get("id"),
        publishable_id: row.get("publishable_id"),
        publish_from: row.get("publish_from"),
        publish_to: row.get("publish_to"),
        commercial: row.get("commercial"),
    }
}
