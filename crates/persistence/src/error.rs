//! Repository error types.

use thiserror::Error;

/// Result alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors returned by repository operations.
///
/// Every variant except [`RepositoryError::Database`] is a recoverable,
/// reportable outcome. `Database` wraps driver failures such as an
/// unreachable server and is treated as fatal by callers.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Client with id={0} does not exist")]
    ClientNotFound(i32),

    #[error("Client {client_id} has no phone number {phone_number}")]
    PhoneNotFound { client_id: i32, phone_number: String },

    #[error("Phone number {0} is already registered")]
    DuplicatePhone(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl RepositoryError {
    /// Returns true if the error should abort the caller instead of being reported.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RepositoryError::Database(_))
    }
}

/// SQLSTATE codes for integrity constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NOT_NULL_VIOLATION: &str = "23502";

/// Returns the SQLSTATE code of a database error, if any.
fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

/// Returns true if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION)
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match sqlstate(&err).as_deref() {
            Some(UNIQUE_VIOLATION)
            | Some(FOREIGN_KEY_VIOLATION)
            | Some(CHECK_VIOLATION)
            | Some(NOT_NULL_VIOLATION) => {
                let message = match &err {
                    sqlx::Error::Database(db_err) => db_err.message().to_string(),
                    other => other.to_string(),
                };
                RepositoryError::ConstraintViolation(message)
            }
            _ => RepositoryError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for RepositoryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{field}: {message}")
                })
            })
            .collect();
        details.sort();
        RepositoryError::Validation(details.join("; "))
    }
}

impl From<validator::ValidationError> for RepositoryError {
    fn from(error: validator::ValidationError) -> Self {
        let message = error
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| error.code.to_string());
        RepositoryError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_driver_errors_are_fatal() {
        let err = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_fatal());
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn test_reportable_errors_are_not_fatal() {
        assert!(!RepositoryError::ClientNotFound(1).is_fatal());
        assert!(!RepositoryError::DuplicatePhone("123".into()).is_fatal());
        assert!(!RepositoryError::Validation("x".into()).is_fatal());
        assert!(!RepositoryError::ConstraintViolation("x".into()).is_fatal());
        assert!(!RepositoryError::InvalidArgument("x".into()).is_fatal());
    }

    #[test]
    fn test_not_found_variants_are_distinct() {
        let client_missing = RepositoryError::ClientNotFound(5);
        let phone_missing = RepositoryError::PhoneNotFound {
            client_id: 5,
            phone_number: "137".into(),
        };
        assert_ne!(client_missing.to_string(), phone_missing.to_string());
        assert_eq!(client_missing.to_string(), "Client with id=5 does not exist");
        assert_eq!(phone_missing.to_string(), "Client 5 has no phone number 137");
    }

    #[test]
    fn test_non_database_error_has_no_sqlstate() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolClosed));
    }

    #[test]
    fn test_from_validation_errors() {
        let client = domain::models::NewClient::new("", "B", "");
        let err: RepositoryError = client.validate().unwrap_err().into();
        match err {
            RepositoryError::Validation(message) => {
                assert!(message.contains("email: Value must not be empty"));
                assert!(message.contains("first_name: Value must not be empty"));
                assert!(message.starts_with("email"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_single_validation_error() {
        let err: RepositoryError = shared::validation::validate_phone_number("12a")
            .unwrap_err()
            .into();
        assert_eq!(
            err.to_string(),
            "Validation error: Phone number must contain digits only"
        );
    }
}
