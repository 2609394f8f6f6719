pub mod analyze;
pub mod health;
pub mod ingest;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

use crate::index::SemanticIndex;
use crate::metrics;
use crate::services::AppState;

/// Maximum concurrent requests (backpressure control)
const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Request timeout; an analysis holds a full model round trip.
const REQUEST_TIMEOUT_SECS: u64 = 90;

pub fn create_router(state: AppState, index: Arc<dyn SemanticIndex>) -> Router {
    let (prometheus_layer, metrics_router) = metrics::setup_metrics();

    // Health routes carry only the index handle
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/readiness", get(health::readiness_check))
        .with_state(index);

    let api_routes = Router::new()
        .route("/api/analyze", post(analyze::analyze_price))
        .route("/api/reset", post(ingest::reset_data))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(metrics_router)
        .layer(
            ServiceBuilder::new()
                // Prometheus metrics (outermost - captures all requests)
                .layer(prometheus_layer)
                // Request timeout
                .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
                // Concurrency limit for backpressure
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS)),
        )
}
