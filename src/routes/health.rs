//! Health check endpoints for liveness and readiness probes
//!
//! - `/health` - Basic liveness check (always returns OK if app is running)
//! - `/readiness` - Deep readiness check (verifies semantic index connectivity)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::index::SemanticIndex;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub semantic_index: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// Liveness probe - always returns OK if the app is running
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - verifies the semantic index is reachable.
///
/// Returns 503 if the check fails.
pub async fn readiness_check(
    State(index): State<Arc<dyn SemanticIndex>>,
) -> impl IntoResponse {
    let start = std::time::Instant::now();

    let index_check = match index.ping().await {
        Ok(_) => CheckResult {
            status: "healthy",
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => CheckResult {
            status: "unhealthy",
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: Some(e.to_string()),
        },
    };

    let overall_healthy = index_check.status == "healthy";

    let response = ReadinessResponse {
        status: if overall_healthy { "ready" } else { "not_ready" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            semantic_index: index_check,
        },
    };

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::response::IntoResponse;

    use super::*;
    use crate::errors::AppError;
    use crate::index::IndexedDocument;

    struct UnreachableIndex;

    #[async_trait]
    impl SemanticIndex for UnreachableIndex {
        async fn upsert(&self, _documents: Vec<IndexedDocument>) -> Result<(), AppError> {
            Err(AppError::IndexUnavailable("down".to_string()))
        }

        async fn query(
            &self,
            _text: &str,
            _top_k: usize,
        ) -> Result<Vec<IndexedDocument>, AppError> {
            Err(AppError::IndexUnavailable("down".to_string()))
        }

        async fn ping(&self) -> Result<(), AppError> {
            Err(AppError::IndexUnavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn liveness_is_always_ok() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_is_503_when_the_index_is_unreachable() {
        let index = Arc::new(UnreachableIndex) as Arc<dyn SemanticIndex>;
        let response = readiness_check(State(index)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
