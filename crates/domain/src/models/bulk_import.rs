//! Bulk client import models.
//!
//! The seed file is a JSON array of records in the form
//! `{"first_name": .., "last_name": .., "email": .., "phones": [..]}`.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::client::NewClient;

/// A single client record in a bulk import file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImportRecord {
    #[validate(custom(function = "shared::validation::validate_name"))]
    pub first_name: String,

    #[validate(custom(function = "shared::validation::validate_name"))]
    pub last_name: String,

    #[validate(custom(function = "shared::validation::validate_email"))]
    pub email: String,

    /// Phone numbers; the file may hold them as strings or as JSON numbers.
    /// Numbers are kept verbatim and checked per phone during the import.
    #[serde(default, deserialize_with = "deserialize_phone_numbers")]
    pub phones: Vec<String>,
}

impl ImportRecord {
    pub fn to_new_client(&self) -> NewClient {
        NewClient::new(&self.first_name, &self.last_name, &self.email)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPhoneNumber {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

fn deserialize_phone_numbers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawPhoneNumber>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|phone| match phone {
            RawPhoneNumber::Text(text) => text,
            RawPhoneNumber::Unsigned(number) => number.to_string(),
            RawPhoneNumber::Signed(number) => number.to_string(),
            RawPhoneNumber::Float(number) => number.to_string(),
        })
        .collect())
}

/// Outcome of a bulk import run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Total number of records processed.
    pub processed: u32,

    /// Number of clients created.
    pub clients_created: u32,

    /// Number of phones added.
    pub phones_added: u32,

    /// Errors encountered, one per failed client or phone.
    pub errors: Vec<ImportError>,
}

/// Error encountered during bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportError {
    /// Record number (1-indexed) where the error occurred.
    pub row: usize,

    /// Phone number that failed, if the error is about a phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Error message.
    pub error: String,
}
