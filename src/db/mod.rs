//! Database layer
//!
//! Read-only access to the content store. The store is a SQLite database
//! owned by the external content-management system; this crate ships the
//! schema migrations so the server and its tests can run against an empty
//! or seeded file, but it never writes content rows itself.

pub mod migrations;
pub mod pool;
pub mod repositories;

#[cfg(test)]
pub mod fixtures;

pub use pool::{create_pool, create_test_pool, DbPool};
