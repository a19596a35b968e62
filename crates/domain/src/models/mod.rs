//! Domain models for the phonebook.

pub mod bulk_import;
pub mod client;
pub mod phone;
pub mod search;

pub use bulk_import::{ImportError, ImportRecord, ImportSummary};
pub use client::{Client, ClientUpdate, NewClient};
pub use phone::Phone;
pub use search::{ClientSearchCriteria, ClientSearchRow};
