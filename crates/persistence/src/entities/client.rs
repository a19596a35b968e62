//! Client entities (database row mappings).

use sqlx::FromRow;

/// Database row mapping for the client table.
#[derive(Debug, Clone, FromRow)]
pub struct ClientEntity {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<ClientEntity> for domain::models::Client {
    fn from(entity: ClientEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
        }
    }
}

/// Database row mapping for the client/phone search join.
#[derive(Debug, Clone, FromRow)]
pub struct ClientSearchEntity {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl From<ClientSearchEntity> for domain::models::ClientSearchRow {
    fn from(entity: ClientSearchEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            phone_number: entity.phone_number,
        }
    }
}
