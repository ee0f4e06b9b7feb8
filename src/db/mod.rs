pub mod models;
pub mod repository;

use crate::config::Config;
use sqlx::{MySqlPool, mysql::MySqlPoolOptions};

/// Build the MySQL connection pool without touching the database.
///
/// Connections are opened on first acquire, so the service starts even when
/// MySQL is down; requests then fall back to synthetic availability.
pub fn init_pool(config: &Config, database_url: &str) -> anyhow::Result<MySqlPool> {
    tracing::info!(
        max_connections = config.db_max_connections,
        connect_timeout_secs = config.db_connect_timeout_secs,
        "Initializing database connection pool"
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.connect_timeout())
        .connect_lazy(database_url)?;

    Ok(pool)
}

pub async fn run_migrations(pool: &MySqlPool) -> anyhow::Result<()> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
