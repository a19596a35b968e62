//! Domain layer for the phonebook.
//!
//! This crate contains:
//! - Domain models (Client, Phone, search criteria and rows)
//! - Bulk import record and summary types

pub mod models;
