//! Phone repository for database operations.

use domain::models::Phone;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use crate::entities::PhoneEntity;
use crate::error::{is_unique_violation, RepositoryError, RepositoryResult};
use crate::metrics::QueryTimer;
use crate::repositories::client_exists;

/// Repository for phone-related database operations.
///
/// Every phone belongs to a client; operations on an unknown client report
/// [`RepositoryError::ClientNotFound`] except [`PhoneRepository::get_phones`],
/// which returns an empty list.
#[derive(Clone)]
pub struct PhoneRepository {
    pool: PgPool,
}

impl PhoneRepository {
    /// Creates a new PhoneRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a phone number to an existing client.
    ///
    /// A number the client already owns is rejected before the insert. A
    /// number owned by another client is rejected by the unique constraint;
    /// both cases report [`RepositoryError::DuplicatePhone`].
    pub async fn add_phone(&self, client_id: i32, phone_number: &str) -> RepositoryResult<Phone> {
        shared::validation::validate_phone_number(phone_number)?;

        let _timer = QueryTimer::new("add_phone");
        let mut tx = self.pool.begin().await?;

        if !client_exists(&mut *tx, client_id).await? {
            return Err(RepositoryError::ClientNotFound(client_id));
        }

        let owned: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM phone WHERE client_id = $1 AND phone_number = $2
            )
            "#,
        )
        .bind(client_id)
        .bind(phone_number)
        .fetch_one(&mut *tx)
        .await?;
        if owned {
            return Err(RepositoryError::DuplicatePhone(phone_number.to_string()));
        }

        let phone = Self::insert(&mut *tx, client_id, phone_number).await?;
        tx.commit().await?;

        debug!(client_id, phone_number, "Phone number added");
        Ok(phone.into())
    }

    /// Find all phones of a client, ordered by id.
    ///
    /// An unknown client yields an empty list.
    pub async fn get_phones(&self, client_id: i32) -> RepositoryResult<Vec<Phone>> {
        let _timer = QueryTimer::new("get_phones");
        let result = sqlx::query_as::<_, PhoneEntity>(
            r#"
            SELECT id, client_id, phone_number
            FROM phone
            WHERE client_id = $1
            ORDER BY id
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await;

        Ok(result?.into_iter().map(Into::into).collect())
    }

    /// Delete every phone of a client.
    /// Returns the number of rows deleted.
    pub async fn delete_phones(&self, client_id: i32) -> RepositoryResult<u64> {
        let _timer = QueryTimer::new("delete_phones");
        let mut tx = self.pool.begin().await?;

        if !client_exists(&mut *tx, client_id).await? {
            return Err(RepositoryError::ClientNotFound(client_id));
        }

        let deleted = Self::delete_all_for_client(&mut *tx, client_id).await?;
        tx.commit().await?;

        debug!(client_id, deleted, "Client phones deleted");
        Ok(deleted)
    }

    /// Delete one phone number of a client.
    ///
    /// Reports [`RepositoryError::PhoneNotFound`] when the client exists but
    /// does not own the number.
    pub async fn delete_phone(&self, client_id: i32, phone_number: &str) -> RepositoryResult<()> {
        let _timer = QueryTimer::new("delete_phone");
        let mut tx = self.pool.begin().await?;

        if !client_exists(&mut *tx, client_id).await? {
            return Err(RepositoryError::ClientNotFound(client_id));
        }

        let result = sqlx::query(
            r#"
            DELETE FROM phone
            WHERE client_id = $1 AND phone_number = $2
            "#,
        )
        .bind(client_id)
        .bind(phone_number)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::PhoneNotFound {
                client_id,
                phone_number: phone_number.to_string(),
            });
        }

        tx.commit().await?;

        debug!(client_id, phone_number, "Phone number deleted");
        Ok(())
    }

    /// Insert a phone row on an open connection or transaction.
    ///
    /// The caller has already checked that the client exists.
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        client_id: i32,
        phone_number: &str,
    ) -> RepositoryResult<PhoneEntity> {
        sqlx::query_as::<_, PhoneEntity>(
            r#"
            INSERT INTO phone (client_id, phone_number)
            VALUES ($1, $2)
            RETURNING id, client_id, phone_number
            "#,
        )
        .bind(client_id)
        .bind(phone_number)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::DuplicatePhone(phone_number.to_string())
            } else {
                err.into()
            }
        })
    }

    /// Delete all phone rows of a client on an open connection or transaction.
    pub(crate) async fn delete_all_for_client(
        conn: &mut PgConnection,
        client_id: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM phone
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }
}
