pub mod availability;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod store;
pub mod telemetry;

use availability::AvailabilityAggregator;
use axum::Router;
use routes::AppState;
use std::sync::Arc;
use store::{BookingStore, MemoryStore, MySqlStore};
use tower_http::trace::TraceLayer;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes(state))
        .layer(TraceLayer::new_for_http())
}

async fn build_store(config: &config::Config) -> anyhow::Result<Arc<dyn BookingStore>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, serving synthetic availability only");
        return Ok(Arc::new(MemoryStore::unreachable("no database configured")));
    };

    let pool = db::init_pool(config, database_url)?;
    if config.run_migrations {
        db::run_migrations(&pool).await?;
    }

    Ok(Arc::new(MySqlStore::new(pool)))
}

pub async fn run(config: config::Config) -> anyhow::Result<()> {
    telemetry::init_tracing(&config.rust_log);

    let store = build_store(&config).await?;
    let aggregator = AvailabilityAggregator::new(store, config.aggregator_settings()?);
    let app = build_app(AppState { aggregator });

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
