use contracts::dashboards::d414_csr::{CsrPerformance, CsrSortKey, CsrTrendPoint};

use super::repository;
use crate::shared::analytics::ranking::{rank_rows, LeaderboardRow, SortKey};
use crate::shared::analytics::{parse_bucket_date, AnalyticsContext, DashboardError};

impl LeaderboardRow for CsrPerformance {
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
    sort: CsrSortKey,
) -> Result<Vec<CsrPerformance>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::performance(ctx, &window).await?;

    let mut staff: Vec<CsrPerformance> = rows
        .iter()
        .map(|m| CsrPerformance {
            rank: 0,
            id: m.int("id"),
            name: m.text("name").unwrap_or_default(),
            email: m.text("email"),
            total_interactions: m.int("total_interactions"),
            new_order_calls: m.int("new_order_calls"),
            complaint_calls: m.int("complaint_calls"),
            inquiry_calls: m.int("inquiry_calls"),
            successful_orders: m.int("successful_orders"),
            successful_registrations: m.int("successful_registrations"),
            complaints_resolved: m.int("complaints_resolved"),
            total_order_value: m.float("total_order_value"),
            avg_call_duration: m.float("avg_call_duration"),
            success_rate: m.float("success_rate"),
        })
        .collect();

    rank_rows(&mut staff, &sort_keys(sort));
    Ok(staff)
}

fn sort_keys(sort: CsrSortKey) -> Vec<SortKey<CsrPerformance>> {
    let interactions = SortKey::desc(|c: &CsrPerformance| c.total_interactions as f64);
    match sort {
        CsrSortKey::Interactions => vec![interactions],
        CsrSortKey::SuccessRate => vec![
            SortKey::desc(|c: &CsrPerformance| c.success_rate),
            interactions,
        ],
        CsrSortKey::Orders => vec![
            SortKey::desc(|c: &CsrPerformance| c.successful_orders as f64),
            interactions,
        ],
        CsrSortKey::OrderValue => vec![
            SortKey::desc(|c: &CsrPerformance| c.total_order_value),
            interactions,
        ],
    }
}

pub async fn get_trends(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<Vec<CsrTrendPoint>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::daily_interactions(ctx, &window).await?;

    Ok(rows
        .into_iter()
        .filter_map(|m| {
            Some(CsrTrendPoint {
                date: parse_bucket_date(m.text("bucket_date"))?,
                csr_id: m.int("csr_id"),
                csr_name: m.text("csr_name").unwrap_or_default(),
                interactions: m.int("interactions"),
            })
        })
        .collect())
}
