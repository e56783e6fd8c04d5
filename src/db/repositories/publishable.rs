//! Publishable and article repository
//!
//! Serves the publishable base table and the article extension (a
//! publishable row joined with its `articles` row). Rows are hydrated with
//! their relations before serialization: the optional photo, the owning
//! category, the authors from the join table and the listings from the
//! reverse relation.
//!
//! Filter predicates for these queries are written against the aliases used
//! here: `p` for publishables, `a` for the article extension.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::{ArticleRecord, Author, Listing, PageParams, Publishable, PublishableRecord};
use crate::resource::CompiledFilter;

use super::author::row_to_author;
use super::category::row_to_category;
use super::listing::row_to_listing;
use super::photo::row_to_photo;
use super::{bind_filters, parse_app_data, where_clause};

const BASE_COLUMNS: &str = "p.id, p.title, p.slug, p.description, p.category_id, p.photo_id, \
     p.publish_from, p.publish_to, p.published, p.announced, p.is_static, p.app_data";

/// Publishable repository trait
#[async_trait]
pub trait PublishableRepository: Send + Sync {
    /// List publishables (articles included) with relations hydrated.
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<PublishableRecord>, i64)>;

    /// Get one publishable by id.
    async fn get(&self, id: i64) -> Result<Option<PublishableRecord>>;

    /// List articles (publishables joined with their extension row).
    async fn list_articles(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<ArticleRecord>, i64)>;

    /// Get one article by publishable id.
    async fn get_article(&self, id: i64) -> Result<Option<ArticleRecord>>;
}

/// SQLx-based publishable repository implementation
pub struct SqlxPublishableRepository {
    pool: DbPool,
}

impl SqlxPublishableRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn PublishableRepository> {
        Arc::new(Self::new(pool))
    }

    async fn hydrate(&self, base: Publishable) -> Result<PublishableRecord> {
        let photo = match base.photo_id {
            Some(photo_id) => {
                let row = sqlx::query(
                    "SELECT id, title, description, slug, image, width, height, \
                     important_top, important_left, important_right, important_bottom, \
                     created, app_data FROM photos WHERE id = ?",
                )
                .bind(photo_id)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to load publishable photo")?;
                match row {
                    Some(row) => Some(row_to_photo(&row)?),
                    None => None,
                }
            }
            None => None,
        };

        let category_row = sqlx::query(
            "SELECT id, title, slug, description, template, tree_path, app_data \
             FROM categories WHERE id = ?",
        )
        .bind(base.category_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to load publishable category")?;
        let category = row_to_category(&category_row);

        let author_rows = sqlx::query(
            "SELECT a.id, a.name, a.slug, a.email, a.description, a.text \
             FROM authors a \
             INNER JOIN publishable_authors pa ON pa.author_id = a.id \
             WHERE pa.publishable_id = ? ORDER BY a.id",
        )
        .bind(base.id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load publishable authors")?;
        let authors: Vec<Author> = author_rows.iter().map(row_to_author).collect();

        let listing_rows = sqlx::query(
            "SELECT id, publishable_id, publish_from, publish_to, commercial \
             FROM listings WHERE publishable_id = ? ORDER BY id",
        )
        .bind(base.id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load publishable listings")?;
        let listings: Vec<Listing> = listing_rows.iter().map(row_to_listing).collect();

        Ok(PublishableRecord {
            base,
            photo,
            category,
            authors,
            listings,
        })
    }
}

#[async_trait]
impl PublishableRepository for SqlxPublishableRepository {
    async fn list(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<PublishableRecord>, i64)> {
        let where_sql = where_clause(filters);

        let sql = format!(
            "SELECT {BASE_COLUMNS} FROM publishables p{where_sql} ORDER BY p.id LIMIT ? OFFSET ?"
        );
        let rows = bind_filters(sqlx::query(&sql), filters)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list publishables")?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(self.hydrate(row_to_publishable(row)).await?);
        }

        let count_sql = format!("SELECT COUNT(*) AS count FROM publishables p{where_sql}");
        let total: i64 = bind_filters(sqlx::query(&count_sql), filters)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count publishables")?
            .get("count");

        Ok((records, total))
    }

    async fn get(&self, id: i64) -> Result<Option<PublishableRecord>> {
        let sql = format!("SELECT {BASE_COLUMNS} FROM publishables p WHERE p.id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get publishable by id")?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row_to_publishable(&row)).await?)),
            None => Ok(None),
        }
    }

    async fn list_articles(
        &self,
        filters: &[CompiledFilter],
        page: &PageParams,
    ) -> Result<(Vec<ArticleRecord>, i64)> {
        let where_sql = where_clause(filters);

        let sql = format!(
            "SELECT {BASE_COLUMNS}, a.content, a.created, a.updated \
             FROM publishables p \
             INNER JOIN articles a ON a.publishable_id = p.id{where_sql} \
             ORDER BY p.id LIMIT ? OFFSET ?"
        );
        let rows = bind_filters(sqlx::query(&sql), filters)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list articles")?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let publishable = self.hydrate(row_to_publishable(row)).await?;
            records.push(ArticleRecord {
                publishable,
                content: row.get("content"),
                created: row.get("created"),
                updated: row.get("updated"),
            });
        }

        let count_sql = format!(
            "SELECT COUNT(*) AS count FROM publishables p \
             INNER JOIN articles a ON a.publishable_id = p.id{where_sql}"
        );
        let total: i64 = bind_filters(sqlx::query(&count_sql), filters)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count articles")?
            .get("count");

        Ok((records, total))
    }

    async fn get_article(&self, id: i64) -> Result<Option<ArticleRecord>> {
        let sql = format!(
            "SELECT {BASE_COLUMNS}, a.content, a.created, a.updated \
             FROM publishables p \
             INNER JOIN articles a ON a.publishable_id = p.id \
             WHERE p.id = ?"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get article by id")?;

        match row {
            Some(row) => {
                let publishable = self.hydrate(row_to_publishable(&row)).await?;
                Ok(Some(ArticleRecord {
                    publishable,
                    content: row.get("content"),
                    created: row.get("created"),
                    updated: row.get("updated"),
                }))
            }
            None => Ok(None),
        }
    }
}

fn row_to_publishable(row: &sqlx::sqlite::SqliteRow) -> Publishable {
    Publishable {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        category_id: row.get("category_id"),
        photo_id: row.get("photo_id"),
        publish_from: row.get("publish_from"),
        publish_to: row.get("publish_to"),
        published: row.get("published"),
        announced: row.get("announced"),
        is_static: row.get("is_static"),
        app_data: parse_app_data(row.get("app_data")),
    }
}
