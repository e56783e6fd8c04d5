//! Resource catalog
//!
//! The declarative part of the API: per-entity resource descriptors and the
//! two app variants that mount them. Everything here is configuration (the
//! entity source, the exposed field set, the filter whitelist, the embedded
//! relations and the access policy per resource) consumed by the generic
//! engine in [`crate::resource`].
//!
//! The shared builders below declare the full filterable field sets; the
//! `front` variant strips filters and tightens exposure, the `scribble`
//! variant opens access and adds the derived `url` field.
//!
//! Filter predicates are written against the backing repository's query:
//! bare column names for the simple tables, the `p`/`a` aliases for
//! publishables and the article extension.

pub mod front;
pub mod scribble;
pub mod sources;

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::db::DbPool;
use crate::resource::{FieldSpec, FieldType, RelationKind, ResourceDescriptor, ResourceRegistry};

/// Which app's resource set to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppVariant {
    /// Front app: five resources, no filtering, restricted access
    Front,
    /// Scribble app: seven resources, open access, full filter whitelists
    Scribble,
}

impl AppVariant {
    /// Variant name for logs and the admin page.
    pub fn label(self) -> &'static str {
        match self {
            AppVariant::Front => "front",
            AppVariant::Scribble => "scribble",
        }
    }

    /// Build the variant's resource registry.
    pub fn build_registry(self, pool: &DbPool, config: &Config) -> anyhow::Result<ResourceRegistry> {
        match self {
            AppVariant::Front => front::build_registry(pool),
            AppVariant::Scribble => scribble::build_registry(pool, &config.site.domain),
        }
    }
}

pub(crate) fn photo_descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new("photo")
        .field(FieldSpec::new("id", FieldType::Int).filterable("id = ?"))
        .field(FieldSpec::new("title", FieldType::Text).filterable("title = ?"))
        .field(FieldSpec::new("description", FieldType::Text).filterable("description = ?"))
        .field(FieldSpec::new("slug", FieldType::Text).filterable("slug = ?"))
        .field(FieldSpec::new("image", FieldType::Text).filterable("image = ?"))
        .field(FieldSpec::new("width", FieldType::Int).filterable("width = ?"))
        .field(FieldSpec::new("height", FieldType::Int).filterable("height = ?"))
        .field(FieldSpec::new("important_top", FieldType::Int).filterable("important_top = ?"))
        .field(FieldSpec::new("important_left", FieldType::Int).filterable("important_left = ?"))
        .field(FieldSpec::new("important_right", FieldType::Int).filterable("important_right = ?"))
        .field(
            FieldSpec::new("important_bottom", FieldType::Int).filterable("important_bottom = ?"),
        )
        .field(FieldSpec::new("created", FieldType::DateTime).filterable("created = ?"))
        .field(FieldSpec::new("app_data", FieldType::Json).filterable("app_data = ?"))
}

pub(crate) fn listing_descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new("listing")
        .field(FieldSpec::new("id", FieldType::Int).filterable("id = ?"))
        .field(FieldSpec::new("publish_from", FieldType::DateTime).filterable("publish_from = ?"))
        .field(FieldSpec::new("publish_to", FieldType::DateTime).filterable("publish_to = ?"))
        .field(FieldSpec::new("commercial", FieldType::Bool).filterable("commercial = ?"))
}

pub(crate) fn author_descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new("author")
        .field(FieldSpec::new("id", FieldType::Int).filterable("id = ?"))
        .field(FieldSpec::new("name", FieldType::Text).filterable("name = ?"))
        .field(FieldSpec::new("slug", FieldType::Text).filterable("slug = ?"))
        .field(FieldSpec::new("email", FieldType::Text).filterable("email = ?"))
        .field(FieldSpec::new("description", FieldType::Text).filterable("description = ?"))
        .field(FieldSpec::new("text", FieldType::Text).filterable("text = ?"))
}

pub(crate) fn category_descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new("category")
        .field(FieldSpec::new("id", FieldType::Int).filterable("id = ?"))
        .field(FieldSpec::new("title", FieldType::Text).filterable("title = ?"))
        .field(FieldSpec::new("slug", FieldType::Text).filterable("slug = ?"))
        .field(FieldSpec::new("description", FieldType::Text).filterable("description = ?"))
        .field(FieldSpec::new("template", FieldType::Text).filterable("template = ?"))
        .field(FieldSpec::new("tree_path", FieldType::Text).filterable("tree_path = ?"))
        .field(FieldSpec::new("app_data", FieldType::Json).filterable("app_data = ?"))
}

pub(crate) fn user_descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new("user")
        .field(FieldSpec::new("id", FieldType::Int).filterable("id = ?"))
        .field(FieldSpec::new("username", FieldType::Text).filterable("username = ?"))
}

/// Publishable descriptor: base fields plus the four embedded relations.
/// Listings come through the reverse relation on the listing side.
pub(crate) fn publishable_descriptor(
    photo: Arc<ResourceDescriptor>,
    category: Arc<ResourceDescriptor>,
    author: Arc<ResourceDescriptor>,
    listing: Arc<ResourceDescriptor>,
) -> ResourceDescriptor {
    ResourceDescriptor::new("publishable")
        .field(FieldSpec::new("id", FieldType::Int).filterable("p.id = ?"))
        .field(FieldSpec::new("title", FieldType::Text).filterable("p.title = ?"))
        .field(FieldSpec::new("slug", FieldType::Text).filterable("p.slug = ?"))
        .field(FieldSpec::new("description", FieldType::Text).filterable("p.description = ?"))
        .field(
            FieldSpec::new("publish_from", FieldType::DateTime).filterable("p.publish_from = ?"),
        )
        .field(FieldSpec::new("publish_to", FieldType::DateTime).filterable("p.publish_to = ?"))
        .field(FieldSpec::new("published", FieldType::Bool).filterable("p.published = ?"))
        .field(FieldSpec::new("announced", FieldType::Bool).filterable("p.announced = ?"))
        .field(FieldSpec::new("static", FieldType::Bool).filterable("p.is_static = ?"))
        .field(FieldSpec::new("app_data", FieldType::Json).filterable("p.app_data = ?"))
        .relation_filterable("photo", RelationKind::OneOptional, photo, "p.photo_id = ?")
        .relation_filterable("category", RelationKind::One, category, "p.category_id = ?")
        .relation_filterable(
            "authors",
            RelationKind::Many,
            author,
            "EXISTS (SELECT 1 FROM publishable_authors pa \
             WHERE pa.publishable_id = p.id AND pa.author_id = ?)",
        )
        .relation_filterable(
            "listings",
            RelationKind::Many,
            listing,
            "EXISTS (SELECT 1 FROM listings l \
             WHERE l.publishable_id = p.id AND l.id = ?)",
        )
}

/// Article descriptor: the publishable descriptor flattened with the
/// article-only fields and the derived upper-cased title.
pub(crate) fn article_descriptor(publishable: &ResourceDescriptor) -> ResourceDescriptor {
    publishable
        .extend("article")
        .field(FieldSpec::new("content", FieldType::Text).filterable("a.content = ?"))
        .field(FieldSpec::new("created", FieldType::DateTime).filterable("a.created = ?"))
        .field(FieldSpec::new("updated", FieldType::DateTime).filterable("a.updated = ?"))
        .computed("upper_title", upper_title)
}

fn upper_title(raw: &Value) -> Value {
    Value::String(
        raw.get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_uppercase(),
    )
}

/// Domain-qualified canonical URL of a publishable:
/// `http://{domain}/{tree_path}/{slug}/`, with the tree path segment dropped
/// for content in the root category.
pub(crate) fn domain_url(domain: &str, raw: &Value) -> Value {
    let slug = raw.get("slug").and_then(Value::as_str).unwrap_or_default();
    let tree_path = raw
        .get("category")
        .and_then(|c| c.get("tree_path"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let url = if tree_path.is_empty() {
        format!("http://{domain}/{slug}/")
    } else {
        format!("http://{domain}/{tree_path}/{slug}/")
    };
    Value::String(url)
}
