//! The fixed demonstration sequence run by the `phonebook` binary.

use domain::models::{ClientSearchCriteria, ClientUpdate, NewClient};
use futures::TryStreamExt;
use persistence::repositories::{ClientRepository, PhoneRepository, SchemaRepository};
use persistence::{RepositoryError, RepositoryResult};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::Config;
use crate::import;

/// Seeded client the demo edits and deletes.
const SEEDED_CLIENT_ID: i32 = 1;

/// Repositories sharing one connection pool.
#[derive(Clone)]
pub struct Repositories {
    pub schema: SchemaRepository,
    pub clients: ClientRepository,
    pub phones: PhoneRepository,
}

impl Repositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            schema: SchemaRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            phones: PhoneRepository::new(pool),
        }
    }
}

/// Log a recoverable failure and turn it into `None`; pass fatal errors on.
fn report<T>(operation: &str, result: RepositoryResult<T>) -> Result<Option<T>, RepositoryError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!(operation, error = %err, "Operation failed");
            Ok(None)
        }
    }
}

/// Recreate the schema, load the seed data and exercise every operation.
pub async fn run(config: &Config, repos: &Repositories) -> anyhow::Result<()> {
    repos.schema.drop_schema().await?;
    repos.schema.create_schema().await?;

    if config.import.enabled {
        let records = import::load_records(&config.import.path).await?;
        let summary = import::import_records(&repos.clients, &repos.phones, &records).await?;
        for error in &summary.errors {
            warn!(
                row = error.row,
                phone_number = ?error.phone_number,
                error = %error.error,
                "Import error"
            );
        }
    }

    let new_client = NewClient::new("Kirill", "Poletaev", "poletaev777@gmail.com");
    if let Some(client) = report("add_client", repos.clients.add_client(&new_client).await)? {
        info!(
            client_id = client.id,
            first_name = %client.first_name,
            last_name = %client.last_name,
            email = %client.email,
            "Client added"
        );

        for number in ["892349120120", "4923449120120", "4923449120120"] {
            let added = repos.phones.add_phone(client.id, number).await;
            if let Some(phone) = report("add_phone", added)? {
                info!(
                    client_id = phone.client_id,
                    phone_number = %phone.phone_number,
                    "Phone added"
                );
            }
        }

        let phones = repos.phones.get_phones(client.id).await?;
        info!(client_id = client.id, phones = ?phones, "Client phones");
    }

    let update = ClientUpdate::default()
        .first_name("One")
        .last_name("Two")
        .phones(["13131313", "4234355", "3343"]);
    if let Some(client) = report(
        "update_client",
        repos.clients.update_client(SEEDED_CLIENT_ID, &update).await,
    )? {
        info!(client = ?client, "Client updated");
    }

    for number in ["4234355", "137"] {
        if report(
            "delete_phone",
            repos.phones.delete_phone(SEEDED_CLIENT_ID, number).await,
        )?
        .is_some()
        {
            info!(client_id = SEEDED_CLIENT_ID, phone_number = number, "Phone deleted");
        }
    }

    if report(
        "delete_client",
        repos.clients.delete_client(SEEDED_CLIENT_ID).await,
    )?
    .is_some()
    {
        info!(client_id = SEEDED_CLIENT_ID, "Client deleted");
    }

    let searches = [
        ClientSearchCriteria::default().first_name("Ethan"),
        ClientSearchCriteria::default()
            .last_name("Wilson")
            .phone("7770001111"),
        ClientSearchCriteria::default().phone("8889990000"),
        ClientSearchCriteria::default().first_name("Liam"),
        ClientSearchCriteria::default().first_name("NULL"),
        ClientSearchCriteria::default(),
    ];
    for criteria in &searches {
        search(&repos.clients, criteria).await?;
    }

    Ok(())
}

async fn search(
    clients: &ClientRepository,
    criteria: &ClientSearchCriteria,
) -> Result<(), RepositoryError> {
    let Some(mut rows) = report("find_clients", clients.find_clients(criteria))? else {
        return Ok(());
    };

    let mut found = 0usize;
    while let Some(row) = report("find_clients", rows.try_next().await)?.flatten() {
        found += 1;
        info!(criteria = ?criteria, row = ?row, "Client found");
    }

    if found == 0 {
        info!(criteria = ?criteria, "Client not found");
    }
    Ok(())
}
