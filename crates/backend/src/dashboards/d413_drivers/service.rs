use contracts::dashboards::d413_drivers::{DriverPerformance, DriverSortKey, DriverTrendPoint};

use super::repository;
use crate::shared::analytics::ranking::{rank_rows, LeaderboardRow, SortKey};
use crate::shared::analytics::{parse_bucket_date, AnalyticsContext, DashboardError};

impl LeaderboardRow for DriverPerformance {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }
}

/// Driver leaderboard for orders created in the window
pub async fn get_performance(
    ctx: &AnalyticsContext,
    token: &str,
    sort: DriverSortKey,
) -> Result<Vec<DriverPerformance>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::performance(ctx, &window).await?;

    let mut drivers: Vec<DriverPerformance> = rows
        .iter()
        .map(|m| DriverPerformance {
            rank: 0,
            id: m.int("id"),
            name: m.text("name").unwrap_or_default(),
            mobile: m.text("mobile"),
            total_orders_assigned: m.int("total_orders_assigned"),
            delivered_count: m.int("delivered_count"),
            out_for_delivery_count: m.int("out_for_delivery_count"),
            delivery_success_rate: m.float("delivery_success_rate"),
            avg_delivery_time_minutes: m.float("avg_delivery_time_minutes"),
            active_days: m.int("active_days"),
            avg_orders_per_day: m.float("avg_orders_per_day"),
        })
        .collect();

    rank_rows(&mut drivers, &sort_keys(sort));
    Ok(drivers)
}

fn sort_keys(sort: DriverSortKey) -> Vec<SortKey<DriverPerformance>> {
    let delivered = SortKey::desc(|d: &DriverPerformance| d.delivered_count as f64);
    match sort {
        DriverSortKey::Delivered => vec![delivered],
        DriverSortKey::SuccessRate => vec![
            SortKey::desc(|d: &DriverPerformance| d.delivery_success_rate),
            delivered,
        ],
        // faster first; drivers without timed deliveries sort last
        DriverSortKey::DeliveryTime => vec![
            SortKey::asc(|d: &DriverPerformance| {
                if d.avg_delivery_time_minutes > 0.0 {
                    d.avg_delivery_time_minutes
                } else {
                    f64::MAX
                }
            }),
            delivered,
        ],
        DriverSortKey::Assigned => vec![
            SortKey::desc(|d: &DriverPerformance| d.total_orders_assigned as f64),
            delivered,
        ],
    }
}

pub async fn get_trends(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<Vec<DriverTrendPoint>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::daily_deliveries(ctx, &window).await?;

    Ok(rows
        .into_iter()
        .filter_map(|m| {
            Some(DriverTrendPoint {
                date: parse_bucket_date(m.text("bucket_date"))?,
                driver_id: m.int("driver_id"),
                driver_name: m.text("driver_name").unwrap_or_default(),
                delivered: m.int("delivered"),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(name: &str, delivered: i64, minutes: f64) -> DriverPerformance {
        DriverPerformance {
            rank: 0,
            id: 0,
            name: name.to_string(),
            mobile: None,
            total_orders_assigned: delivered,
            delivered_count: delivered,
            out_for_delivery_count: 0,
            delivery_success_rate: 100.0,
            avg_delivery_time_minutes: minutes,
            active_days: 1,
            avg_orders_per_day: delivered as f64,
        }
    }

    #[test]
    fn test_delivery_time_sort_puts_untimed_drivers_last() {
        let mut drivers = vec![
            driver("Emeka", 3, 0.0),
            driver("Femi", 2, 45.5),
            driver("Gbenga", 5, 30.0),
        ];
        rank_rows(&mut drivers, &sort_keys(DriverSortKey::DeliveryTime));
        let names: Vec<&str> = drivers.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Gbenga", "Femi", "Emeka"]);
        assert_eq!(drivers[2].rank, 3);
    }
}
