//! Schema management for the client and phone tables.

use sqlx::PgPool;
use tracing::info;

use crate::error::RepositoryResult;
use crate::metrics::QueryTimer;

const CREATE_CLIENT_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS client (
        id SERIAL PRIMARY KEY,
        first_name VARCHAR(64) NOT NULL,
        last_name VARCHAR(64) NOT NULL,
        email VARCHAR(128) NOT NULL
    )
"#;

const CREATE_PHONE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS phone (
        id SERIAL PRIMARY KEY,
        client_id INTEGER NOT NULL REFERENCES client(id),
        phone_number VARCHAR(30) UNIQUE CHECK (phone_number ~ '^[0-9]+$')
    )
"#;

/// Creates and drops the phonebook tables.
#[derive(Clone)]
pub struct SchemaRepository {
    pool: PgPool,
}

impl SchemaRepository {
    /// Creates a new SchemaRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the client and phone tables if they do not exist.
    pub async fn create_schema(&self) -> RepositoryResult<()> {
        let _timer = QueryTimer::new("create_schema");

        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_CLIENT_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_PHONE_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;

        info!("Tables \"client\" and \"phone\" created");
        Ok(())
    }

    /// Drop the phone table, then the client table. Missing tables are ignored.
    pub async fn drop_schema(&self) -> RepositoryResult<()> {
        let _timer = QueryTimer::new("drop_schema");

        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS phone")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS client")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Tables \"client\" and \"phone\" dropped");
        Ok(())
    }
}
