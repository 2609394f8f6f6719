use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::ingest::IngestionOutcome;
use crate::services::AppState;

#[derive(Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub documents: usize,
}

/// Administrative trigger: force a full re-ingestion of the catalog.
#[instrument(skip_all)]
pub async fn reset_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let outcome = state.ingest_service.ingest(true).await?;

    let response = match outcome {
        IngestionOutcome::Ingested(documents) => ResetResponse {
            status: "ingested",
            documents,
        },
        // Not reachable with force=true, but the outcome type covers it
        IngestionOutcome::Skipped => ResetResponse {
            status: "skipped",
            documents: 0,
        },
    };
    Ok(Json(response))
}
