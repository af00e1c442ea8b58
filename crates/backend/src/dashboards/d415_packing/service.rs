use contracts::dashboards::d415_packing::{PackingPerformance, PackingSortKey, PackingTrendPoint};

use super::repository;
use crate::shared::analytics::ranking::{rank_rows, LeaderboardRow, SortKey};
use crate::shared::analytics::{parse_bucket_date, AnalyticsContext, DashboardError};

impl LeaderboardRow for PackingPerformance {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

pub async fn get_performance(
    ctx: &AnalyticsContext,
    token: &str,
    sort: PackingSortKey,
) -> Result<Vec<PackingPerformance>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::performance(ctx, &window).await?;

    let mut packers: Vec<PackingPerformance> = rows
        .iter()
        .map(|m| PackingPerformance {
            rank: 0,
            id: m.int("id"),
            name: m.text("name").unwrap_or_default(),
            email: m.text("email"),
            total_orders_packed: m.int("total_orders_packed"),
            orders_shipped: m.int("orders_shipped"),
            orders_delivered: m.int("orders_delivered"),
            orders_returned: m.int("orders_returned"),
            success_rate: m.float("success_rate"),
            avg_packing_time_minutes: m.float("avg_packing_time_minutes"),
            active_days: m.int("active_days"),
        })
        .collect();

    rank_rows(&mut packers, &sort_keys(sort));
    Ok(packers)
}

fn sort_keys(sort: PackingSortKey) -> Vec<SortKey<PackingPerformance>> {
    let packed = SortKey::desc(|p: &PackingPerformance| p.total_orders_packed as f64);
    match sort {
        PackingSortKey::Packed => vec![packed],
        PackingSortKey::SuccessRate => vec![
            SortKey::desc(|p: &PackingPerformance| p.success_rate),
            packed,
        ],
        PackingSortKey::PackingTime => vec![
            SortKey::asc(|p: &PackingPerformance| {
                if p.avg_packing_time_minutes > 0.0 {
                    p.avg_packing_time_minutes
                } else {
                    f64::MAX
                }
            }),
            packed,
        ],
        // fewest returns first
        PackingSortKey::Returned => vec![
            SortKey::asc(|p: &PackingPerformance| p.orders_returned as f64),
            packed,
        ],
    }
}

pub async fn get_trends(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<Vec<PackingTrendPoint>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::daily_packing(ctx, &window).await?;

    Ok(rows
        .into_iter()
        .filter_map(|m| {
            Some(PackingTrendPoint {
                date: parse_bucket_date(m.text("bucket_date"))?,
                packer_id: m.int("packer_id"),
                packer_name: m.text("packer_name").unwrap_or_default(),
                orders_packed: m.int("orders_packed"),
                orders_shipped: m.int("orders_shipped"),
            })
        })
        .collect())
}
