//! Category entity

use serde::{Deserialize, Serialize};

/// A node in the site's category tree.
///
/// `tree_path` encodes the hierarchical position as a slash-separated path
/// of slugs (empty for the root category). It also forms the path segment of
/// canonical content URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Category title
    pub title: String,
    /// URL-friendly slug
    pub slug: String,
    /// Free-form description
    pub description: String,
    /// Template used to render the category page
    pub template: String,
    /// Hierarchical position, e.g. `"culture/movies"`
    pub tree_path: String,
    /// Free-form per-application data (JSON object)
    #[serde(default = "default_app_data")]
    pub app_data: serde_json::Value,
}

fn default_app_data() -> serde_json::Value {
    serde_json::json!({})
}
