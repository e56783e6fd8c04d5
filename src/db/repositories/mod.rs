//! Repositories
//!
//! One repository per content entity, each a trait plus a SQLx
//! implementation. All queries are reads; list queries accept compiled
//! equality filters from the resource engine and a paging window, and
//! return the page together with the unpaged total.

mod author;
mod category;
mod listing;
mod photo;
mod publishable;
mod user;

pub use author::{AuthorRepository, SqlxAuthorRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use listing::{ListingRepository, SqlxListingRepository};
pub use photo::{PhotoRepository, SqlxPhotoRepository};
pub use publishable::{PublishableRepository, SqlxPublishableRepository};
pub use user::{SqlxUserRepository, UserRepository};

use sqlx::sqlite::SqliteArguments;
use sqlx::{query::Query, Sqlite};

use crate::resource::{BindValue, CompiledFilter};

/// Render compiled filters as a `WHERE` clause, empty when unfiltered.
pub(crate) fn where_clause(filters: &[CompiledFilter]) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let predicates: Vec<&str> = filters.iter().map(|f| f.sql).collect();
    format!(" WHERE {}", predicates.join(" AND "))
}

/// Bind the filter values in predicate order.
pub(crate) fn bind_filters<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    filters: &'q [CompiledFilter],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for filter in filters {
        query = match &filter.value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
            BindValue::Bool(v) => query.bind(*v),
            BindValue::DateTime(v) => query.bind(*v),
        };
    }
    query
}

/// Parse an `app_data` column, defaulting to an empty object on bad rows.
pub(crate) fn parse_app_data(raw: String) -> serde_json::Value {
    serde_json::from_str(&raw).unwrap_or_else(|_| serde_json::json!({}))
}
