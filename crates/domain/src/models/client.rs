//! Client domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A person record with a name and an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Input for creating a client.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    #[validate(custom(function = "shared::validation::validate_name"))]
    pub first_name: String,

    #[validate(custom(function = "shared::validation::validate_name"))]
    pub last_name: String,

    #[validate(custom(function = "shared::validation::validate_email"))]
    pub email: String,
}

impl NewClient {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }
}

/// Partial update of a client.
///
/// Fields left as `None` are not touched. When `phones` is `Some`, the
/// client's phone set is replaced wholesale, so `Some(vec![])` removes every
/// phone while keeping the client.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    #[validate(custom(function = "shared::validation::validate_name"))]
    pub first_name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_name"))]
    pub last_name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_email"))]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_phone_numbers"))]
    pub phones: Option<Vec<String>>,
}

impl ClientUpdate {
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Replace the phone set with the given numbers.
    pub fn phones<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = Some(numbers.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if at least one client column is supplied.
    pub fn has_field_changes(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some() || self.email.is_some()
    }
}
