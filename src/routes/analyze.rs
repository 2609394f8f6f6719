use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::errors::AppError;
use crate::services::aggregate::{self, PricePoint};
use crate::services::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub product_name: String,
    pub price: f64,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    pub average_market_price: Option<f64>,
    pub comparison_data: Vec<PricePoint>,
}

#[instrument(skip_all)]
pub async fn analyze_price(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.product_name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Product name is required".to_string(),
        ));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(AppError::ValidationError(
            "Price must be a non-negative number".to_string(),
        ));
    }

    let result = state
        .analysis_service
        .analyze(&payload.product_name, payload.price)
        .await?;

    // Both outputs derive from the one retrieved set inside `result`
    let comparison_data = aggregate::comparison_series(payload.price, &result.documents);
    let average_market_price = aggregate::average_market_price(&result.documents);

    Ok(Json(AnalyzeResponse {
        analysis: result.narrative,
        average_market_price,
        comparison_data,
    }))
}
