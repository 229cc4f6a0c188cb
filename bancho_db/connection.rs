use sqlx::postgres::{PgPool, PgPoolOptions};
use std::env;

use bancho_app::config::Config;
use bancho_types::errors::{AppError, ApplicationError, DbError};

pub type DbPool = PgPool;

pub async fn establish_connection_pool(config: &Config) -> Result<DbPool, ApplicationError> {
    init_connection_pool(&config.database_url, config.db_max_connections).await
}

pub async fn establish_test_connection_pool() -> Result<DbPool, ApplicationError> {
    dotenvy::dotenv().ok();

    let database_url =
        env::var("TEST_DATABASE_URL").map_err(|_| AppError::MissingEnv("TEST_DATABASE_URL"))?;
    init_connection_pool(&database_url, 5).await
}

/// Applies the SQL migrations shipped in `migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), ApplicationError> {
    sqlx::migrate!("../migrations")
        .run(pool)
        .await
        .map_err(|e| ApplicationError::Db(DbError::Migration(e)))
}

async fn init_connection_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<DbPool, ApplicationError> {
    Ok(PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(DbError::Database)?)
}
