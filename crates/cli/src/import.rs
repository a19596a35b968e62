//! Bulk import of clients and phones from a JSON seed file.

use std::path::Path;

use anyhow::Context;
use domain::models::{ImportError, ImportRecord, ImportSummary};
use persistence::repositories::{ClientRepository, PhoneRepository};
use persistence::{RepositoryError, RepositoryResult};
use tracing::{info, warn};
use validator::Validate;

/// Parse a JSON array of import records.
pub fn parse_records(json: &str) -> Result<Vec<ImportRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and parse the seed file at `path`.
pub async fn load_records(path: impl AsRef<Path>) -> anyhow::Result<Vec<ImportRecord>> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read import file {}", path.display()))?;
    parse_records(&json).with_context(|| format!("invalid import file {}", path.display()))
}

/// Insert every record and its phones.
///
/// Invalid records and rejected phones are collected into the summary and
/// the import moves on. Only fatal database errors abort the run.
pub async fn import_records(
    clients: &ClientRepository,
    phones: &PhoneRepository,
    records: &[ImportRecord],
) -> RepositoryResult<ImportSummary> {
    let mut summary = ImportSummary::default();

    for (index, record) in records.iter().enumerate() {
        let row = index + 1;
        summary.processed += 1;

        if let Err(errors) = record.validate() {
            let err = RepositoryError::from(errors);
            warn!(row, error = %err, "Skipping invalid import record");
            summary.errors.push(ImportError {
                row,
                phone_number: None,
                error: err.to_string(),
            });
            continue;
        }

        let client = match clients.add_client(&record.to_new_client()).await {
            Ok(client) => client,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(row, error = %err, "Failed to import client");
                summary.errors.push(ImportError {
                    row,
                    phone_number: None,
                    error: err.to_string(),
                });
                continue;
            }
        };
        summary.clients_created += 1;

        for phone_number in &record.phones {
            match phones.add_phone(client.id, phone_number).await {
                Ok(_) => summary.phones_added += 1,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(
                        row,
                        client_id = client.id,
                        phone_number = %phone_number,
                        error = %err,
                        "Failed to import phone"
                    );
                    summary.errors.push(ImportError {
                        row,
                        phone_number: Some(phone_number.clone()),
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    info!(
        processed = summary.processed,
        clients_created = summary.clients_created,
        phones_added = summary.phones_added,
        errors = summary.errors.len(),
        "Import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let json = r#"[
            {"first_name": "Ethan", "last_name": "Wilson", "email": "e@w.io", "phones": [7770001111, "8889990000"]},
            {"first_name": "Liam", "last_name": "Brown", "email": "l@b.io", "phones": []}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phones, vec!["7770001111", "8889990000"]);
        assert!(records[1].phones.is_empty());
    }

    #[test]
    fn test_parse_records_rejects_object() {
        assert!(parse_records(r#"{"first_name": "A"}"#).is_err());
    }

    #[test]
    fn test_parse_records_missing_field() {
        assert!(parse_records(r#"[{"first_name": "A", "last_name": "B"}]"#).is_err());
    }

    #[test]
    fn test_shipped_seed_file_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/clients.json");
        let json = std::fs::read_to_string(path).unwrap();
        let records = parse_records(&json).unwrap();
        assert!(!records.is_empty());
        for record in &records {
            assert!(record.validate().is_ok(), "{record:?}");
            for phone in &record.phones {
                assert!(phone.chars().all(|c| c.is_ascii_digit()), "{phone}");
            }
        }
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = tokio_test::block_on(load_records("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read import file"));
    }
}
