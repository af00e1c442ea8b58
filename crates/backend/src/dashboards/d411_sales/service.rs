use contracts::dashboards::d411_sales::{SalesSummary, SalesTrendPoint};

use super::repository;
use crate::shared::analytics::{day_name, parse_bucket_date, AnalyticsContext, DashboardError};

pub async fn get_summary(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<SalesSummary, DashboardError> {
    let window = ctx.window(token)?;
    let m = repository::summary(ctx, &window).await?;

    tracing::debug!(
        "D411 Sales: {} orders, revenue {} (window {})",
        m.int("total_orders"),
        m.float("total_revenue"),
        window
    );

    Ok(SalesSummary {
        total_orders: m.int("total_orders"),
        total_order_value: m.float("total_order_value"),
        total_delivery_charges: m.float("total_delivery_charges"),
        total_revenue: m.float("total_revenue"),
        unique_customers: m.int("unique_customers"),
        unique_referral_codes: m.int("unique_referral_codes"),
        avg_order_value: m.float("avg_order_value"),
        avg_order_total: m.float("avg_order_total"),
        avg_delivery_charge: m.float("avg_delivery_charge"),
        active_days: m.int("active_days"),
        sr_linked_orders: m.int("sr_linked_orders"),
        sr_linked_order_total: m.float("sr_linked_order_total"),
        sr_linked_delivery_charges: m.float("sr_linked_delivery_charges"),
        sr_linked_revenue: m.float("sr_linked_revenue"),
        sr_linked_percentage: m.float("sr_linked_percentage"),
    })
}

pub async fn get_trends(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<Vec<SalesTrendPoint>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::daily_trend(ctx, &window).await?;

    Ok(rows
        .into_iter()
        .filter_map(|m| {
            let date = parse_bucket_date(m.text("bucket_date"))?;
            Some(SalesTrendPoint {
                date,
                total_orders: m.int("total_orders"),
                total_order_value: m.float("total_order_value"),
                total_delivery_charges: m.float("total_delivery_charges"),
                total_revenue: m.float("total_revenue"),
                unique_customers: m.int("unique_customers"),
                avg_order_value: m.float("avg_order_value"),
                avg_order_total: m.float("avg_order_total"),
                avg_delivery_charge: m.float("avg_delivery_charge"),
                sr_linked_orders: m.int("sr_linked_orders"),
                sr_linked_order_total: m.float("sr_linked_order_total"),
                sr_linked_delivery_charges: m.float("sr_linked_delivery_charges"),
                sr_linked_revenue: m.float("sr_linked_revenue"),
                day_name: day_name(date),
            })
        })
        .collect())
}
