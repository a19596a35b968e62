//! Repository implementations for database operations.

pub mod client;
pub mod phone;
pub mod schema;

pub use client::ClientRepository;
pub use phone::PhoneRepository;
pub use schema::SchemaRepository;

use sqlx::PgExecutor;

/// Returns true if a client row with the given id exists.
pub(crate) async fn client_exists<'e, E>(executor: E, client_id: i32) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e> + 'e,
{
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM client WHERE id = $1)")
        .bind(client_id)
        .fetch_one(executor)
        .await
}
