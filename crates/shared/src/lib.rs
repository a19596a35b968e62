//! Shared utilities and common types for the phonebook.
//!
//! This crate provides common functionality used across all other crates:
//! - Common validation logic (names, emails, phone numbers)

pub mod validation;
