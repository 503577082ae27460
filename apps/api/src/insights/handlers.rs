//! Axum route handlers for the Insights API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::insights::schema::Insight;
use crate::insights::service::{BatchReport, InsightError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IndustryQuery {
    pub industry: String,
}

/// GET /api/v1/insights?industry=Software
///
/// Returns the cached insight for the industry, generating it on first request.
/// Stale records are returned as-is; the weekly refresh regenerates them.
pub async fn handle_get_insight(
    State(state): State<AppState>,
    Query(params): Query<IndustryQuery>,
) -> Result<Json<Insight>, AppError> {
    let insight = state.insights.resolve_for_user(&params.industry).await?;
    Ok(Json(insight))
}

/// POST /api/v1/insights/refresh
///
/// Runs the batch refresh immediately and returns its report.
pub async fn handle_refresh_all(
    State(state): State<AppState>,
) -> Result<Json<BatchReport>, AppError> {
    let report = state
        .insights
        .refresh_all()
        .await
        .map_err(InsightError::from)?;
    Ok(Json(report))
}
