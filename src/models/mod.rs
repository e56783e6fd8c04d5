//! Data models
//!
//! This module contains the content-store entities served by the API.
//! All entities are owned by the external content-management system; this
//! crate only reads and serializes them.

mod author;
mod category;
mod listing;
mod paging;
mod photo;
mod publishable;
mod user;

pub use author::Author;
pub use category::Category;
pub use listing::Listing;
pub use paging::PageParams;
pub use photo::Photo;
pub use publishable::{ArticleRecord, Publishable, PublishableRecord};
pub use user::User;
