use anyhow::Context;

use bancho_app::{config::Config, repository::MapRequestRepository};
use bancho_db::{PostgresMapRequestRepository, establish_connection_pool, run_migrations};
use bancho_types::{Result, errors::ApplicationError, map_request::MapRequestFilter};

mod logs;
use logs::setup_logging;

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let _log_guard = setup_logging(&config)?;

    let map_requests = open_map_requests(&config).await?;
    report_map_requests(&map_requests)
        .await
        .context("Failed to read map requests")
}

async fn open_map_requests(config: &Config) -> anyhow::Result<PostgresMapRequestRepository> {
    let db_pool = establish_connection_pool(config)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to apply database migrations")?;
    tracing::info!("Database migrations applied.");

    Ok(PostgresMapRequestRepository::new(db_pool))
}

async fn report_map_requests(repo: &dyn MapRequestRepository) -> Result<(), ApplicationError> {
    let total = repo.fetch_count(MapRequestFilter::new()).await?;
    let pending = repo.fetch_count(MapRequestFilter::new().active(true)).await?;

    tracing::info!(total, pending, "Map request queue loaded.");
    Ok(())
}
