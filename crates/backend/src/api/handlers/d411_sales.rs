use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d411_sales::{SalesSummary, SalesTrendPoint};
use contracts::shared::range::RangeQuery;

use crate::api::error::ApiError;
use crate::dashboards::d411_sales::service;
use crate::state::AppState;

const DEFAULT_RANGE: &str = "30d";

/// GET /api/sales/summary?dateRange=30d
pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<SalesSummary>, ApiError> {
    let token = query.token_or(DEFAULT_RANGE);
    tracing::info!("D411 Sales: summary for {}", token);

    match service::get_summary(&state.analytics, token).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("D411 Sales: summary for {} failed: {}", token, e);
            Err(e.into())
        }
    }
}

/// GET /api/sales/trends?dateRange=30d
pub async fn get_trends(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<SalesTrendPoint>>, ApiError> {
    let token = query.token_or(DEFAULT_RANGE);

    let points = service::get_trends(&state.analytics, token).await?;
    tracing::info!("D411 Sales: {} trend days for {}", points.len(), token);
    Ok(Json(points))
}
