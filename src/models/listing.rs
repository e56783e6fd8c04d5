//! Listing entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduling record attaching a publish window to a publishable.
///
/// Many listings may reference one publishable; the publishable side sees
/// them through the reverse relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Unique identifier
    pub id: i64,
    /// The publishable this listing schedules
    pub publishable_id: i64,
    /// Start of the publish window
    pub publish_from: DateTime<Utc>,
    /// End of the publish window, open-ended when unset
    pub publish_to: Option<DateTime<Utc>>,
    /// Commercial content flag
    pub commercial: bool,
}
