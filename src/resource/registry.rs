//! Resource registry
//!
//! An explicit, ordered registration list built at process startup. Every
//! resource is registered by hand in declaration order; there is no
//! auto-discovery and no import-time side effect. Registering two resources
//! under one name fails loudly instead of shadowing.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::PageParams;

use super::descriptor::ResourceDescriptor;
use super::field::CompiledFilter;

/// One page of raw hydrated records plus the unpaged total.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub records: Vec<Value>,
    pub total: i64,
}

/// Data access behind a resource: all rows of the backing entity, optionally
/// restricted by compiled equality filters. Records come back as raw JSON
/// objects with relations already hydrated; the descriptor shapes them.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn list(&self, filters: &[CompiledFilter], page: &PageParams) -> Result<RecordPage>;
    async fn get(&self, id: i64) -> Result<Option<Value>>;
}

/// A mounted resource: its declaration plus its record source.
#[derive(Clone)]
pub struct RegisteredResource {
    pub descriptor: Arc<ResourceDescriptor>,
    pub source: Arc<dyn RecordSource>,
}

/// Registration failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("resource '{0}' is already registered")]
    Duplicate(String),
}

/// Ordered collection of mounted resources.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    entries: Vec<RegisteredResource>,
    index: HashMap<String, usize>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a resource. Order of calls is the mount order.
    pub fn register(
        &mut self,
        descriptor: ResourceDescriptor,
        source: Arc<dyn RecordSource>,
    ) -> Result<(), RegistryError> {
        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.index.insert(name, self.entries.len());
        self.entries.push(RegisteredResource {
            descriptor: Arc::new(descriptor),
            source,
        });
        Ok(())
    }

    /// Look up a mounted resource by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredResource> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Mounted resource names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.descriptor.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
