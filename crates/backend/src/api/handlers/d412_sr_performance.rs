use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::dashboards::d412_sr_performance::{
    ExportFormat, ExportQuery, SrDashboardSummary, SrLeaderboardEntry, SrProfile, SrRosterEntry,
    SrSortKey, SrTrendPoint,
};
use contracts::shared::range::{LeaderboardQuery, RangeQuery};

use crate::api::error::ApiError;
use crate::dashboards::d412_sr_performance::service::{self, SrExport};
use crate::shared::export::{export_file_name, to_csv};
use crate::state::AppState;
use crate::system::auth::extractor::CurrentUser;

const DEFAULT_EXPORT_RANGE: &str = "30d";

/// GET /api/srs?dateRange=all
pub async fn list_srs(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<SrRosterEntry>>, ApiError> {
    let token = query.token_or("all");

    let roster = service::get_roster(&state.analytics, token).await?;
    tracing::info!("D412 SR: {} valid SRs for {}", roster.len(), token);
    Ok(Json(roster))
}

/// GET /api/srs/:id?dateRange=30d, `:id` is the numeric id or the referral code
pub async fn get_sr(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<SrProfile>, ApiError> {
    let token = query.token_or("30d");

    let profile = service::get_profile(&state.analytics, &id, token).await?;
    Ok(Json(profile))
}

/// GET /api/leaderboard?dateRange=7d&sortBy=registrations|revenue|orders|conversion
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<SrLeaderboardEntry>>, ApiError> {
    let range = query.range();
    let token = range.token_or("7d");
    let sort = SrSortKey::from_param(query.sort_by.as_deref());
    tracing::info!("D412 SR: leaderboard for {} by {:?}", token, sort);

    let entries = service::get_leaderboard(&state.analytics, token, sort).await?;
    Ok(Json(entries))
}

/// GET /api/dashboard/summary?dateRange=7d
pub async fn get_dashboard_summary(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<SrDashboardSummary>, ApiError> {
    let token = query.token_or("7d");

    let summary = service::get_dashboard_summary(&state.analytics, token).await?;
    Ok(Json(summary))
}

/// GET /api/dashboard/trends?dateRange=7d
pub async fn get_dashboard_trends(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<SrTrendPoint>>, ApiError> {
    let token = query.token_or("7d");

    let points = service::get_trends(&state.analytics, token).await?;
    Ok(Json(points))
}

/// GET /api/export?dateRange=30d&format=csv|json&detail=detailed|summary (admin)
pub async fn export(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let token = query
        .date_range
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_EXPORT_RANGE);
    let format = query.export_format();
    let detail = query.export_detail();

    let data = service::get_export(&state.analytics, token, detail).await?;
    tracing::info!(
        "D412 SR: {:?} exported {} {:?} rows as {:?} for {}",
        user.role(),
        data.len(),
        detail,
        format,
        token
    );

    match format {
        ExportFormat::Json => Ok(match data {
            SrExport::Detailed(rows) => Json(rows).into_response(),
            SrExport::Summary(rows) => Json(rows).into_response(),
        }),
        ExportFormat::Csv => {
            let body = match &data {
                SrExport::Detailed(rows) => to_csv(rows)?,
                SrExport::Summary(rows) => to_csv(rows)?,
            };
            let file_name = export_file_name(token, chrono::Local::now().naive_local(), "csv");
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                body,
            )
                .into_response())
        }
    }
}
