use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d410_registrations::{
    RegistrationSource, RegistrationSummary, RegistrationTrendPoint,
};
use contracts::shared::range::RangeQuery;

use crate::api::error::ApiError;
use crate::dashboards::d410_registrations::service;
use crate::state::AppState;

const DEFAULT_RANGE: &str = "30d";

/// GET /api/registrations/summary?dateRange=30d
pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RegistrationSummary>, ApiError> {
    let token = query.token_or(DEFAULT_RANGE);
    tracing::info!("D410 Registrations: summary for {}", token);

    let summary = service::get_summary(&state.analytics, token).await?;
    Ok(Json(summary))
}

/// GET /api/registrations/trends?dateRange=30d
pub async fn get_trends(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<RegistrationTrendPoint>>, ApiError> {
    let token = query.token_or(DEFAULT_RANGE);

    let points = service::get_trends(&state.analytics, token).await?;
    tracing::info!("D410 Registrations: {} trend days for {}", points.len(), token);
    Ok(Json(points))
}

/// GET /api/registrations/sources?dateRange=30d
pub async fn get_sources(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<RegistrationSource>>, ApiError> {
    let token = query.token_or(DEFAULT_RANGE);

    let sources = service::get_sources(&state.analytics, token).await?;
    Ok(Json(sources))
}
