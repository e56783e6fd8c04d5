//! User entity

use serde::{Deserialize, Serialize};

/// A platform user account. Only the username is exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Login name
    pub username: String,
}
