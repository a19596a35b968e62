//! Phone domain model.

use serde::{Deserialize, Serialize};

/// A digit-string contact number owned by exactly one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub id: i32,
    pub client_id: i32,
    pub phone_number: String,
}
