use anyhow::Result;
use tracing::info;

use phonebook_cli::{config, demo, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging);

    info!("Starting phonebook v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    let repos = demo::Repositories::new(pool.clone());
    let result = demo::run(&config, &repos).await;

    persistence::metrics::record_pool_metrics(&pool);
    pool.close().await;
    info!("Connection pool closed");

    result
}
