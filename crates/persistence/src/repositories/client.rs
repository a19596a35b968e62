//! Client repository for database operations.

use domain::models::{Client, ClientSearchCriteria, ClientSearchRow, ClientUpdate, NewClient};
use futures::channel::mpsc;
use futures::stream::BoxStream;
use futures::{SinkExt, StreamExt, TryStreamExt};
use sqlx::PgPool;
use tracing::debug;
use validator::Validate;

use crate::entities::{ClientEntity, ClientSearchEntity};
use crate::error::{RepositoryError, RepositoryResult};
use crate::metrics::QueryTimer;
use crate::query_builder::{ClientSearchQuery, ClientUpdateQuery};
use crate::repositories::{client_exists, PhoneRepository};

/// Rows a search may read ahead of its consumer.
pub const SEARCH_BUFFER: usize = 64;

/// Repository for client-related database operations.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    /// Creates a new ClientRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a client and return it with its generated id.
    pub async fn add_client(&self, input: &NewClient) -> RepositoryResult<Client> {
        input.validate()?;

        let _timer = QueryTimer::new("add_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            INSERT INTO client (first_name, last_name, email)
            VALUES ($1, $2, $3)
            RETURNING id, first_name, last_name, email
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .fetch_one(&self.pool)
        .await;

        let client: Client = result?.into();
        debug!(client_id = client.id, "Client added");
        Ok(client)
    }

    /// Find a client by id. Returns `None` if no client has this id.
    pub async fn get_client(&self, id: i32) -> RepositoryResult<Option<Client>> {
        let _timer = QueryTimer::new("get_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            SELECT id, first_name, last_name, email
            FROM client
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        Ok(result?.map(Into::into))
    }

    /// Apply a partial update to a client.
    ///
    /// Only the supplied columns change. When the update carries a phone
    /// list, the client's phones are deleted and the new ones inserted in the
    /// same transaction, so a failing number leaves the client untouched.
    pub async fn update_client(&self, id: i32, update: &ClientUpdate) -> RepositoryResult<Client> {
        update.validate()?;

        let _timer = QueryTimer::new("update_client");
        let mut tx = self.pool.begin().await?;

        let entity = match ClientUpdateQuery::build(update) {
            Some(query) => {
                let mut statement = sqlx::query_as::<_, ClientEntity>(query.sql()).bind(id);
                for param in query.params() {
                    statement = statement.bind(param.as_str());
                }
                statement.fetch_optional(&mut *tx).await?
            }
            None => {
                sqlx::query_as::<_, ClientEntity>(
                    r#"
                    SELECT id, first_name, last_name, email
                    FROM client
                    WHERE id = $1
                    FOR UPDATE
                    "#,
                )
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
            }
        };
        let Some(entity) = entity else {
            return Err(RepositoryError::ClientNotFound(id));
        };

        if let Some(phones) = &update.phones {
            PhoneRepository::delete_all_for_client(&mut *tx, id).await?;
            for phone_number in phones {
                PhoneRepository::insert(&mut *tx, id, phone_number).await?;
            }
        }

        tx.commit().await?;

        debug!(
            client_id = id,
            fields_changed = update.has_field_changes(),
            phones_replaced = update.phones.is_some(),
            "Client updated"
        );
        Ok(entity.into())
    }

    /// Delete a client together with all of its phones.
    ///
    /// The phones and the client row are removed in one transaction, so no
    /// orphan phone survives a failure halfway through.
    pub async fn delete_client(&self, id: i32) -> RepositoryResult<()> {
        let _timer = QueryTimer::new("delete_client");
        let mut tx = self.pool.begin().await?;

        if !client_exists(&mut *tx, id).await? {
            return Err(RepositoryError::ClientNotFound(id));
        }

        let phones_deleted = PhoneRepository::delete_all_for_client(&mut *tx, id).await?;

        sqlx::query(
            r#"
            DELETE FROM client
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(client_id = id, phones_deleted, "Client deleted");
        Ok(())
    }

    /// Stream the rows matching the criteria.
    ///
    /// Each row pairs a client with one of its phone numbers, or with `None`
    /// when the client has no phones. Rows are read by a background task as
    /// the stream is consumed, at most [`SEARCH_BUFFER`] ahead of the caller.
    /// Fails with [`RepositoryError::InvalidArgument`] if no criterion is
    /// given. Must be called inside a Tokio runtime.
    pub fn find_clients(
        &self,
        criteria: &ClientSearchCriteria,
    ) -> RepositoryResult<BoxStream<'static, RepositoryResult<ClientSearchRow>>> {
        let query = ClientSearchQuery::build(criteria)?;
        let pool = self.pool.clone();
        let (mut sender, receiver) = mpsc::channel(SEARCH_BUFFER);

        tokio::spawn(async move {
            let _timer = QueryTimer::new("find_clients");
            let mut rows = fetch_search_rows(&pool, &query);
            while let Some(row) = rows.next().await {
                let row = row
                    .map(ClientSearchRow::from)
                    .map_err(RepositoryError::from);
                let failed = row.is_err();
                if sender.send(row).await.is_err() {
                    debug!("Client search stream dropped by the caller");
                    break;
                }
                if failed {
                    break;
                }
            }
        });

        Ok(receiver.boxed())
    }

    /// Search clients and collect every matching row.
    ///
    /// Same criteria rules as [`ClientRepository::find_clients`]. No match is
    /// an empty list.
    pub async fn search_clients(
        &self,
        criteria: &ClientSearchCriteria,
    ) -> RepositoryResult<Vec<ClientSearchRow>> {
        self.find_clients(criteria)?.try_collect().await
    }
}

fn fetch_search_rows<'a>(
    pool: &'a PgPool,
    query: &'a ClientSearchQuery,
) -> BoxStream<'a, Result<ClientSearchEntity, sqlx::Error>> {
    let mut statement = sqlx::query_as::<_, ClientSearchEntity>(query.sql());
    for param in query.params() {
        statement = statement.bind(param.as_str());
    }
    statement.fetch(pool)
}
