use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d415_packing::{PackingPerformance, PackingSortKey, PackingTrendPoint};
use contracts::shared::range::{LeaderboardQuery, RangeQuery};

use crate::api::error::ApiError;
use crate::dashboards::d415_packing::service;
use crate::state::AppState;

const DEFAULT_RANGE: &str = "30d";

/// GET /api/packing?dateRange=30d&sortBy=..
pub async fn get_performance(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<PackingPerformance>>, ApiError> {
    let range = query.range();
    let token = range.token_or(DEFAULT_RANGE);
    let sort = PackingSortKey::from_param(query.sort_by.as_deref());

    let rows = service::get_performance(&state.analytics, token, sort).await?;
    tracing::info!("D415 Packing: {} rows for {} by {:?}", rows.len(), token, sort);
    Ok(Json(rows))
}

/// GET /api/packing/trends?dateRange=30d
pub async fn get_trends(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<PackingTrendPoint>>, ApiError> {
    let token = query.token_or(DEFAULT_RANGE);

    let points = service::get_trends(&state.analytics, token).await?;
    Ok(Json(points))
}
