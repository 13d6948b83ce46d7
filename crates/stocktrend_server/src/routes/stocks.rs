//! Aggregated stock report endpoint

use axum::{extract::State, response::Json, routing::get, Router};
use stocktrend_feeds::StockReportEnvelope;

use super::AppState;
use crate::error::ApiError;

/// Build the stock routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/stocks", get(get_stocks))
}

/// GET /stocks - Domestic and international game stocks
///
/// Source failures only thin the report; an error here means the
/// aggregation itself failed and is returned as a 500.
async fn get_stocks(State(state): State<AppState>) -> Result<Json<StockReportEnvelope>, ApiError> {
    let report = state.aggregator.build_report().await?;
    tracing::info!(total_count = report.total_count, "Stock report built");
    Ok(Json(report))
}
