use std::collections::BTreeMap;

use chrono::NaiveDate;
use contracts::dashboards::d412_sr_performance::{
    ExportDetail, SrDailyPoint, SrDashboardSummary, SrExportRow, SrLeaderboardEntry, SrProfile,
    SrRosterEntry, SrSortKey, SrTrendPoint,
};
use contracts::enums::OrderStatus;

use super::repository::{self, RosterFilter, ACTIVITY_ORDERS, ACTIVITY_REGISTRATIONS};
use crate::shared::analytics::metrics::{round_to, TypedMetrics};
use crate::shared::analytics::ranking::{rank_rows, LeaderboardRow, SortKey};
use crate::shared::analytics::{parse_bucket_date, AnalyticsContext, DashboardError};

/// Export payload, shape depends on the requested detail
#[derive(Debug, Clone, PartialEq)]
pub enum SrExport {
    Detailed(Vec<SrExportRow>),
    Summary(Vec<SrRosterEntry>),
}

impl SrExport {
    pub fn len(&self) -> usize {
        match self {
            SrExport::Detailed(rows) => rows.len(),
            SrExport::Summary(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LeaderboardRow for SrLeaderboardEntry {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

fn roster_entry(m: &TypedMetrics) -> SrRosterEntry {
    SrRosterEntry {
        id: m.int("id"),
        name: m.text("name").unwrap_or_default(),
        referral_code: m.text("referral_code").unwrap_or_default(),
        phone: m.text("phone"),
        email: m.text("email"),
        profile_image: m.text("profile_image"),
        join_date: m.text("join_date"),
        total_customers_registered: m.int("total_customers_registered"),
        total_orders: m.int("total_orders"),
        total_order_value: m.float("total_order_value"),
    }
}

/// Valid referrers with their rollups, most registrations first
pub async fn get_roster(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<Vec<SrRosterEntry>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::roster(ctx, &window, &RosterFilter::All).await?;
    Ok(rows.iter().map(roster_entry).collect())
}

/// One valid referrer by numeric id or referral code
pub async fn get_profile(
    ctx: &AnalyticsContext,
    key: &str,
    token: &str,
) -> Result<SrProfile, DashboardError> {
    let window = ctx.window(token)?;
    let rows =
        repository::roster(ctx, &window, &RosterFilter::IdOrCode(key.trim().to_string())).await?;

    let entry = rows
        .iter()
        .map(roster_entry)
        .next()
        .ok_or_else(|| DashboardError::NotFound(format!("SR `{}`", key)))?;

    let activity =
        repository::daily_activity(ctx, &window, Some(entry.referral_code.as_str())).await?;
    let mut daily_data: Vec<SrDailyPoint> = fold_daily(&activity).into_values().collect();
    daily_data.reverse();

    Ok(SrProfile { entry, daily_data })
}

pub async fn get_leaderboard(
    ctx: &AnalyticsContext,
    token: &str,
    sort: SrSortKey,
) -> Result<Vec<SrLeaderboardEntry>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::roster(ctx, &window, &RosterFilter::All).await?;

    let mut entries: Vec<SrLeaderboardEntry> = rows
        .iter()
        .map(|m| SrLeaderboardEntry {
            rank: 0,
            id: m.int("id"),
            name: m.text("name").unwrap_or_default(),
            referral_code: m.text("referral_code").unwrap_or_default(),
            profile_image: m.text("profile_image"),
            total_customers_registered: m.int("total_customers_registered"),
            total_orders: m.int("total_orders"),
            total_order_value: m.float("total_order_value"),
            conversion_rate: m.float("conversion_rate"),
        })
        .collect();

    rank_rows(&mut entries, &sort_keys(sort));
    Ok(entries)
}

fn sort_keys(sort: SrSortKey) -> Vec<SortKey<SrLeaderboardEntry>> {
    let registrations =
        SortKey::desc(|e: &SrLeaderboardEntry| e.total_customers_registered as f64);
    match sort {
        SrSortKey::Registrations => vec![registrations],
        SrSortKey::Revenue => vec![
            SortKey::desc(|e: &SrLeaderboardEntry| e.total_order_value),
            registrations,
        ],
        SrSortKey::Orders => vec![
            SortKey::desc(|e: &SrLeaderboardEntry| e.total_orders as f64),
            registrations,
        ],
        SrSortKey::Conversion => vec![
            SortKey::desc(|e: &SrLeaderboardEntry| e.conversion_rate),
            registrations,
        ],
    }
}

pub async fn get_dashboard_summary(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<SrDashboardSummary, DashboardError> {
    let window = ctx.window(token)?;
    let m = repository::dashboard_summary(ctx, &window).await?;

    Ok(SrDashboardSummary {
        total_registrations: m.int("total_registrations"),
        total_orders: m.int("total_orders"),
        total_order_value: m.float("total_order_value"),
        total_active_srs: m.int("total_active_srs"),
        average_order_value: m.float("average_order_value"),
        conversion_rate: m.float("conversion_rate"),
    })
}

/// SR-linked activity per day across all valid referrers, oldest first
pub async fn get_trends(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<Vec<SrTrendPoint>, DashboardError> {
    let window = ctx.window(token)?;
    let activity = repository::daily_activity(ctx, &window, None).await?;

    Ok(fold_daily(&activity)
        .into_values()
        .map(|day| SrTrendPoint {
            date: day.date,
            registrations: day.registrations,
            orders: day.orders,
            revenue: day.order_value,
        })
        .collect())
}

/// Collapse activity rows into one point per day, ascending by date
pub fn fold_daily(rows: &[TypedMetrics]) -> BTreeMap<NaiveDate, SrDailyPoint> {
    let mut days: BTreeMap<NaiveDate, SrDailyPoint> = BTreeMap::new();

    for row in rows {
        let Some(date) = parse_bucket_date(row.text("bucket_date")) else {
            continue;
        };
        let day = days.entry(date).or_insert_with(|| SrDailyPoint {
            date,
            registrations: 0,
            orders: 0,
            order_value: 0.0,
        });

        match row.text("activity").as_deref() {
            Some(ACTIVITY_REGISTRATIONS) => day.registrations += row.int("activity_count"),
            Some(ACTIVITY_ORDERS) => {
                day.orders += row.int("activity_count");
                day.order_value = round_to(day.order_value + row.float("activity_value"), 2);
            }
            other => tracing::warn!("D412: unexpected activity kind {:?}", other),
        }
    }

    days
}

pub async fn get_export(
    ctx: &AnalyticsContext,
    token: &str,
    detail: ExportDetail,
) -> Result<SrExport, DashboardError> {
    let window = ctx.window(token)?;

    match detail {
        ExportDetail::Summary => {
            let rows = repository::roster(ctx, &window, &RosterFilter::All).await?;
            Ok(SrExport::Summary(rows.iter().map(roster_entry).collect()))
        }
        ExportDetail::Detailed => {
            let rows = repository::export_rows(ctx, &window).await?;
            Ok(SrExport::Detailed(rows.iter().map(export_row).collect()))
        }
    }
}

fn export_row(m: &TypedMetrics) -> SrExportRow {
    let date = |column: &str| {
        m.text(column)
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
    };

    SrExportRow {
        sr_name: m.text("sr_name").unwrap_or_default(),
        sr_code: m.text("sr_code").unwrap_or_default(),
        customer_name: m.text("customer_name"),
        customer_phone: m.text("customer_phone"),
        registration_date: date("registration_date"),
        order_id: m.opt_int("order_id"),
        order_value: m.opt_float("order_value"),
        order_date: date("order_date"),
        order_status: m
            .text("order_status")
            .and_then(|code| OrderStatus::from_code(&code)),
    }
}
