pub mod pools;

use crate::availability::AvailabilityAggregator;
use crate::store::Storage;
use axum::{Json, Router, extract::State, routing::get};
use serde_json::json;
use std::time::Duration;

/// Upper bound on the storage check in `/health`.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub aggregator: AvailabilityAggregator,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/pools/{id}/availability-stats",
            get(pools::availability_stats),
        )
        .with_state(state)
}

/// Liveness plus a storage check.
///
/// Each call checks out one pooled connection and returns it immediately.
/// When the database is down the check gives up after
/// `HEALTH_CHECK_TIMEOUT` instead of the pool's connect timeout.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let check = state.aggregator.store().connect();
    let database = match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, check).await {
        Ok(Storage::Connected(_)) => "connected",
        Ok(Storage::Unavailable(_)) | Err(_) => "unavailable",
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::AggregatorSettings;
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::FixedOffset;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(store: MemoryStore) -> Router {
        let settings = AggregatorSettings {
            reference_offset: FixedOffset::east_opt(7 * 3600).unwrap(),
            request_timeout: Duration::from_secs(5),
        };
        routes(AppState {
            aggregator: AvailabilityAggregator::new(Arc::new(store), settings),
        })
    }

    async fn get_health(app: Router) -> serde_json::Value {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let store = MemoryStore::new();
        let body = get_health(app(store.clone())).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["database"], "connected");
        assert_eq!(store.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_health_reports_unavailable_database() {
        let body = get_health(app(MemoryStore::unreachable("down"))).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "unavailable");
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_gives_up_on_slow_database() {
        let store = MemoryStore::new().with_connect_delay(Duration::from_secs(30));
        let started = tokio::time::Instant::now();

        let body = get_health(app(store.clone())).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "unavailable");
        assert!(started.elapsed() < Duration::from_secs(30));
        assert_eq!(store.open_sessions(), 0);
    }
}
