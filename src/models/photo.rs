//! Photo entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An image record with dimensions, an optional "important region" crop box
/// and free-form app data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    /// Unique identifier
    pub id: i64,
    /// Photo title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// URL-friendly slug
    pub slug: String,
    /// Image file path relative to the media root
    pub image: String,
    /// Image width in pixels
    pub width: i64,
    /// Image height in pixels
    pub height: i64,
    /// Important-region crop bounds, unset when no crop is defined
    pub important_top: Option<i64>,
    pub important_left: Option<i64>,
    pub important_right: Option<i64>,
    pub important_bottom: Option<i64>,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Free-form per-application data (JSON object)
    #[serde(default = "default_app_data")]
    pub app_data: serde_json::Value,
}

fn default_app_data() -> serde_json::Value {
    serde_json::json!({})
}
