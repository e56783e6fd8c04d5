//! Publishable and Article entities
//!
//! `Publishable` is the generic base entity for any content item eligible
//! for scheduled publication. Articles are publishables with an extension
//! row holding the body and edit timestamps; the article record type flattens
//! both into one serialized object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, Category, Listing, Photo};

/// Base publishable row as stored.
///
/// `category_id`/`photo_id` are storage-level references; API payloads carry
/// the embedded `category`/`photo` objects instead (see
/// [`PublishableRecord`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publishable {
    /// Unique identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// URL-friendly slug
    pub slug: String,
    /// Free-form description
    pub description: String,
    /// Owning category
    pub category_id: i64,
    /// Optional cover photo
    pub photo_id: Option<i64>,
    /// Start of the publish window
    pub publish_from: DateTime<Utc>,
    /// End of the publish window, open-ended when unset
    pub publish_to: Option<DateTime<Utc>>,
    /// Whether the item is published
    pub published: bool,
    /// Whether the item is announced on the front page
    pub announced: bool,
    /// Whether the item is pinned regardless of publish window
    #[serde(rename = "static")]
    pub is_static: bool,
    /// Free-form per-application data (JSON object)
    #[serde(default = "default_app_data")]
    pub app_data: serde_json::Value,
}

fn default_app_data() -> serde_json::Value {
    serde_json::json!({})
}

/// A publishable with its relations hydrated for serialization.
///
/// Relations are embedded by value: a missing photo serializes as `null`,
/// authors and listings as arrays (listings through the reverse relation on
/// the listing side).
#[derive(Debug, Clone, Serialize)]
pub struct PublishableRecord {
    #[serde(flatten)]
    pub base: Publishable,
    pub photo: Option<Photo>,
    pub category: Category,
    pub authors: Vec<Author>,
    pub listings: Vec<Listing>,
}

/// An article: a hydrated publishable plus the article extension fields.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleRecord {
    #[serde(flatten)]
    pub publishable: PublishableRecord,
    /// Article body
    pub content: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last update timestamp
    pub updated: DateTime<Utc>,
}
