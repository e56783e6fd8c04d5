//! User repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::{PageParams, User};
use crate::resource::CompiledFilter;

use super::{bind_filters, where_clause};

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<User>, i64)>;

    async fn get(&self, id: i64) -> Result<Option<User>>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<User>, i64)> {
        let where_sql = where_clause(filters);

        let sql =
            format!("SELECT id, username FROM users{where_sql} ORDER BY id LIMIT ? OFFSET ?");
        let rows = bind_filters(sqlx::query(&sql), filters)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users")?;

        let users = rows
            .iter()
            .map(|row| User {
                id: row.get("id"),
                username: row.get("username"),
            })
            .collect();

        let count_sql = format!("SELECT COUNT(*) AS count FROM users{where_sql}");
        let total: i64 = bind_filters(sqlx::query(&count_sql), filters)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?
            .get("count");

        Ok((users, total))
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get user by id")?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            username: row.get("username"),
        }))
    }
}
