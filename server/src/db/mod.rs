//! Database startup: pool construction and embedded schema migrations.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::ServerConfig;

// Upper bound on waiting for a pool connection inside a handler.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the shared connection pool and bring the schema up to date before
/// the API starts accepting traffic.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn init_pool(config: &ServerConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
