mod common;

use backend::dashboards::d411_sales::service;
use backend::shared::analytics::{AggregationError, DashboardError, MetricFamily};
use common::OrderRow;

const DAY: &str = "custom:2025-08-17:2025-08-17";

#[tokio::test]
async fn test_single_sr_linked_order() {
    let ctx = common::context().await;
    common::seed_roster(&ctx.db).await;
    common::user(&ctx.db, 1, Some("AMY7"), "2025-08-10 08:00:00").await;
    common::order(&ctx.db, OrderRow::new(1, 1, 17.25, "6", "2025-08-17 10:15:00")).await;

    let summary = service::get_summary(&ctx, DAY).await.unwrap();

    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.total_order_value, 17.25);
    assert_eq!(summary.total_revenue, 17.25);
    assert_eq!(summary.sr_linked_orders, 1);
    assert_eq!(summary.sr_linked_percentage, 100.0);
    assert_eq!(summary.avg_order_value, 17.25);
    assert_eq!(summary.unique_customers, 1);
    assert_eq!(summary.unique_referral_codes, 1);
    assert_eq!(summary.active_days, 1);
}

#[tokio::test]
async fn test_empty_window_is_all_zero() {
    let ctx = common::context().await;
    common::seed_roster(&ctx.db).await;

    let summary = service::get_summary(&ctx, DAY).await.unwrap();

    assert_eq!(summary.total_orders, 0);
    assert_eq!(summary.total_order_value, 0.0);
    assert_eq!(summary.total_revenue, 0.0);
    assert_eq!(summary.avg_order_value, 0.0);
    assert_eq!(summary.avg_delivery_charge, 0.0);
    assert_eq!(summary.sr_linked_percentage, 0.0);
    assert_eq!(summary.active_days, 0);
}

#[tokio::test]
async fn test_only_fulfilled_orders_count() {
    let ctx = common::context().await;
    common::seed_roster(&ctx.db).await;
    common::user(&ctx.db, 1, Some("AMY7"), "2025-08-10 08:00:00").await;
    common::user(&ctx.db, 2, None, "2025-08-11 08:00:00").await;
    common::user(&ctx.db, 3, Some("TST3"), "2025-08-12 08:00:00").await;

    let mut delivered = OrderRow::new(1, 1, 20.0, "6", "2025-08-17 09:00:00");
    delivered.delivery_charge = 5.0;
    common::order(&ctx.db, delivered).await;
    common::order(&ctx.db, OrderRow::new(2, 2, 10.0, "3", "2025-08-17 11:00:00")).await;
    common::order(&ctx.db, OrderRow::new(3, 3, 30.0, "4", "2025-08-17 12:00:00")).await;
    // awaiting payment, cancelled and returned orders are ignored
    common::order(&ctx.db, OrderRow::new(4, 1, 99.0, "1", "2025-08-17 13:00:00")).await;
    common::order(&ctx.db, OrderRow::new(5, 1, 99.0, "7", "2025-08-17 14:00:00")).await;
    common::order(&ctx.db, OrderRow::new(6, 2, 99.0, "8", "2025-08-17 15:00:00")).await;
    // outside the window
    common::order(&ctx.db, OrderRow::new(7, 1, 99.0, "6", "2025-08-18 00:00:01")).await;

    let summary = service::get_summary(&ctx, DAY).await.unwrap();

    assert_eq!(summary.total_orders, 3);
    assert_eq!(summary.total_order_value, 60.0);
    assert_eq!(summary.total_delivery_charges, 5.0);
    assert_eq!(summary.total_revenue, 65.0);
    assert_eq!(summary.avg_order_value, 21.67);
    assert_eq!(summary.avg_order_total, 20.0);
    // the test account's customer is not SR-linked
    assert_eq!(summary.sr_linked_orders, 1);
    assert_eq!(summary.sr_linked_revenue, 25.0);
    assert_eq!(summary.sr_linked_percentage, 33.3);
}

#[tokio::test]
async fn test_summary_is_idempotent() {
    let ctx = common::context().await;
    common::seed_roster(&ctx.db).await;
    common::user(&ctx.db, 1, Some("BOK2"), "2025-08-10 08:00:00").await;
    common::order(&ctx.db, OrderRow::new(1, 1, 12.5, "5", "2025-08-17 10:00:00")).await;

    let first = service::get_summary(&ctx, DAY).await.unwrap();
    let second = service::get_summary(&ctx, DAY).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_trend_is_most_recent_first() {
    let ctx = common::context().await;
    common::seed_roster(&ctx.db).await;
    common::user(&ctx.db, 1, Some("AMY7"), "2025-08-10 08:00:00").await;
    common::order(&ctx.db, OrderRow::new(1, 1, 10.0, "6", "2025-08-15 10:00:00")).await;
    common::order(&ctx.db, OrderRow::new(2, 1, 20.0, "6", "2025-08-17 10:00:00")).await;
    common::order(&ctx.db, OrderRow::new(3, 1, 30.0, "2", "2025-08-17 18:00:00")).await;

    let points = service::get_trends(&ctx, "custom:2025-08-11:2025-08-17")
        .await
        .unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date.to_string(), "2025-08-17");
    assert_eq!(points[0].day_name, "Sunday");
    assert_eq!(points[0].total_orders, 2);
    assert_eq!(points[0].total_revenue, 50.0);
    assert_eq!(points[0].sr_linked_orders, 2);
    assert_eq!(points[1].date.to_string(), "2025-08-15");
    assert_eq!(points[1].day_name, "Friday");
}

#[tokio::test]
async fn test_malformed_custom_token_is_rejected() {
    let ctx = common::context().await;

    let err = service::get_summary(&ctx, "custom:2025-08-17").await.unwrap_err();
    assert!(matches!(err, DashboardError::Range(_)));
}

#[tokio::test]
async fn test_window_includes_orders_at_midnight() {
    let ctx = common::context().await;
    common::seed_roster(&ctx.db).await;
    common::user(&ctx.db, 1, Some("AMY7"), "2025-08-10 08:00:00").await;
    common::order(&ctx.db, OrderRow::new(1, 1, 10.0, "6", "2025-08-17 00:00:00")).await;
    common::order(&ctx.db, OrderRow::new(2, 1, 15.0, "6", "2025-08-17 23:59:59")).await;
    common::order(&ctx.db, OrderRow::new(3, 1, 99.0, "6", "2025-08-16 23:59:59")).await;

    let summary = service::get_summary(&ctx, DAY).await.unwrap();

    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.total_order_value, 25.0);
}

#[tokio::test]
async fn test_store_failure_is_an_error_not_zeros() {
    let ctx = common::context().await;
    common::seed_roster(&ctx.db).await;
    common::drop_table(&ctx.db, "orders").await;

    let err = service::get_summary(&ctx, DAY).await.unwrap_err();

    match err {
        DashboardError::Aggregation(e @ AggregationError::Store { .. }) => {
            assert_eq!(e.family(), MetricFamily::SalesSummary);
            assert!(e.is_retryable());
        }
        other => panic!("expected a store failure, got {:?}", other),
    }
    assert!(service::get_trends(&ctx, DAY).await.is_err());
}
