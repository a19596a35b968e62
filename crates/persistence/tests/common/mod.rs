//! Common test utilities for repository integration tests.
//!
//! These helpers connect to the PostgreSQL database named by
//! `TEST_DATABASE_URL`. When the variable is unset the tests return early
//! without touching a database.

#![allow(dead_code)]

use domain::models::{Client, NewClient};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use persistence::repositories::{ClientRepository, PhoneRepository, SchemaRepository};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Repositories sharing one pool over a freshly created schema.
pub struct TestContext {
    pub pool: PgPool,
    pub schema: SchemaRepository,
    pub clients: ClientRepository,
    pub phones: PhoneRepository,
}

/// Create a test database pool, or `None` if no test database is configured.
pub async fn create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    Some(pool)
}

/// Drop and recreate the schema so every test starts with empty tables and
/// ids counting from 1.
pub async fn setup() -> Option<TestContext> {
    let pool = create_test_pool().await?;
    let schema = SchemaRepository::new(pool.clone());
    schema.drop_schema().await.expect("Failed to drop schema");
    schema.create_schema().await.expect("Failed to create schema");

    Some(TestContext {
        clients: ClientRepository::new(pool.clone()),
        phones: PhoneRepository::new(pool.clone()),
        schema,
        pool,
    })
}

/// Build a client input with generated names.
pub fn fake_new_client() -> NewClient {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    let email: String = SafeEmail().fake();
    NewClient::new(first, last, email)
}

/// Insert a client with generated names.
pub async fn create_fake_client(ctx: &TestContext) -> Client {
    ctx.clients
        .add_client(&fake_new_client())
        .await
        .expect("Failed to add client")
}
