//! Persistence layer for the phonebook.
//!
//! This crate contains:
//! - Database connection management
//! - Schema creation and removal
//! - Parameter-bound query fragment construction
//! - Entity definitions (database row mappings)
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod query_builder;
pub mod repositories;

pub use error::{RepositoryError, RepositoryResult};
