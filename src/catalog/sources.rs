//! Record sources
//!
//! Adapters bridging the repositories to the engine's [`RecordSource`]
//! trait: each wraps one repository and turns its typed rows into raw JSON
//! records for descriptor shaping.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::db::repositories::{
    AuthorRepository, CategoryRepository, ListingRepository, PhotoRepository,
    PublishableRepository, UserRepository,
};
use crate::models::PageParams;
use crate::resource::{CompiledFilter, RecordPage, RecordSource};

fn to_records<T: Serialize>(rows: Vec<T>, total: i64) -> Result<RecordPage> {
    let records = rows
        .into_iter()
        .map(|row| serde_json::to_value(row).map_err(Into::into))
        .collect::<Result<Vec<Value>>>()?;
    Ok(RecordPage { records, total })
}

fn to_record<T: Serialize>(row: Option<T>) -> Result<Option<Value>> {
    Ok(match row {
        Some(row) => Some(serde_json::to_value(row)?),
        None => None,
    })
}

pub struct PhotoSource {
    repo: Arc<dyn PhotoRepository>,
}

impl PhotoSource {
    pub fn new(repo: Arc<dyn PhotoRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RecordSource for PhotoSource {
    async fn list(&self, filters: &[CompiledFilter], page: &PageParams) -> Result<RecordPage> {
        let (rows, total) = self.repo.list(filters, page).await?;
        to_records(rows, total)
    }

    async fn get(&self, id: i64) -> Result<Option<Value>> {
        to_record(self.repo.get(id).await?)
    }
}

pub struct ListingSource {
    repo: Arc<dyn ListingRepository>,
}

impl ListingSource {
    pub fn new(repo: Arc<dyn ListingRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RecordSource for ListingSource {
    async fn list(&self, filters: &[CompiledFilter], page: &PageParams) -> Result<RecordPage> {
        let (rows, total) = self.repo.list(filters, page).await?;
        to_records(rows, total)
    }

    async fn get(&self, id: i64) -> Result<Option<Value>> {
        to_record(self.repo.get(id).await?)
    }
}

pub struct AuthorSource {
    repo: Arc<dyn AuthorRepository>,
}

impl AuthorSource {
    pub fn new(repo: Arc<dyn AuthorRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RecordSource for AuthorSource {
    async fn list(&self, filters: &[CompiledFilter], page: &PageParams) -> Result<RecordPage> {
        let (rows, total) = self.repo.list(filters, page).await?;
        to_records(rows, total)
    }

    async fn get(&self, id: i64) -> Result<Option<Value>> {
        to_record(self.repo.get(id).await?)
    }
}

pub struct CategorySource {
    repo: Arc<dyn CategoryRepository>,
}

impl CategorySource {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RecordSource for CategorySource {
    async fn list(&self, filters: &[CompiledFilter], page: &PageParams) -> Result<RecordPage> {
        let (rows, total) = self.repo.list(filters, page).await?;
        to_records(rows, total)
    }

    async fn get(&self, id: i64) -> Result<Option<Value>> {
        to_record(self.repo.get(id).await?)
    }
}

pub struct UserSource {
    repo: Arc<dyn UserRepository>,
}

impl UserSource {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RecordSource for UserSource {
    async fn list(&self, filters: &[CompiledFilter], page: &PageParams) -> Result<RecordPage> {
        let (rows, total) = self.repo.list(filters, page).await?;
        to_records(rows, total)
    }

    async fn get(&self, id: i64) -> Result<Option<Value>> {
        to_record(self.repo.get(id).await?)
    }
}

pub struct PublishableSource {
    repo: Arc<dyn PublishableRepository>,
}

impl PublishableSource {
    pub fn new(repo: Arc<dyn PublishableRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RecordSource for PublishableSource {
    async fn list(&self, filters: &[CompiledFilter], page: &PageParams) -> Result<RecordPage> {
        let (rows, total) = self.repo.list(filters, page).await?;
        to_records(rows, total)
    }

    async fn get(&self, id: i64) -> Result<Option<Value>> {
        to_record(self.repo.get(id).await?)
    }
}

/// Same repository as [`PublishableSource`], restricted to rows that carry
/// the article extension.
pub struct ArticleSource {
    repo: Arc<dyn PublishableRepository>,
}

impl ArticleSource {
    pub fn new(repo: Arc<dyn PublishableRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RecordSource for ArticleSource {
    async fn list(&self, filters: &[CompiledFilter], page: &PageParams) -> Result<RecordPage> {
        let (rows, total) = self.repo.list_articles(filters, page).await?;
        to_records(rows, total)
    }

    async fn get(&self, id: i64) -> Result<Option<Value>> {
        to_record(self.repo.get_article(id).await?)
    }
}
