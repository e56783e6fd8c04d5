//! Author entity

use serde::{Deserialize, Serialize};

/// A content author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL-friendly slug
    pub slug: String,
    /// Contact email, may be empty
    pub email: String,
    /// Short description
    pub description: String,
    /// Long free-form text
    pub text: String,
}
