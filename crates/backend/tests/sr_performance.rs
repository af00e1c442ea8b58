mod common;

use backend::dashboards::d412_sr_performance::service::{self, SrExport};
use backend::shared::analytics::DashboardError;
use backend::shared::export::to_csv;
use common::OrderRow;
use contracts::dashboards::d412_sr_performance::{ExportDetail, SrSortKey};
use contracts::enums::OrderStatus;
use sea_orm::DatabaseConnection;

const WINDOW: &str = "custom:2025-08-16:2025-08-17";

async fn seed_activity(db: &DatabaseConnection) {
    common::seed_roster(db).await;
    common::user(db, 1, Some("AMY7"), "2025-08-16 09:00:00").await;
    common::user(db, 2, Some("AMY7"), "2025-08-17 09:00:00").await;
    common::user(db, 3, Some("BOK2"), "2025-08-17 10:00:00").await;
    common::user(db, 4, Some("TST3"), "2025-08-17 11:00:00").await;

    let mut paid = OrderRow::new(1, 1, 20.0, "6", "2025-08-17 12:00:00");
    paid.delivery_charge = 5.0;
    common::order(db, paid).await;
    common::transaction(db, 1, "success").await;
    common::order(db, OrderRow::new(2, 1, 10.0, "7", "2025-08-16 12:00:00")).await;
    common::order(db, OrderRow::new(3, 3, 30.0, "3", "2025-08-17 13:00:00")).await;
    common::transaction(db, 3, "failed").await;
    common::order(db, OrderRow::new(4, 4, 50.0, "6", "2025-08-17 14:00:00")).await;
    common::transaction(db, 4, "success").await;
}

#[tokio::test]
async fn test_roster_lists_valid_referrers_only() {
    let ctx = common::context().await;
    seed_activity(&ctx.db).await;

    let roster = service::get_roster(&ctx, "all").await.unwrap();

    let codes: Vec<&str> = roster.iter().map(|r| r.referral_code.as_str()).collect();
    assert_eq!(codes, vec!["AMY7", "BOK2"]);
    assert_eq!(roster[0].total_customers_registered, 2);
    assert_eq!(roster[0].total_orders, 1);
    assert_eq!(roster[0].total_order_value, 25.0);
    assert_eq!(roster[0].phone.as_deref(), Some("08000000001"));
    assert_eq!(roster[1].total_orders, 1);
    assert_eq!(roster[1].total_order_value, 30.0);
}

#[tokio::test]
async fn test_profile_by_id_or_code() {
    let ctx = common::context().await;
    seed_activity(&ctx.db).await;

    let by_id = service::get_profile(&ctx, "1", WINDOW).await.unwrap();
    let by_code = service::get_profile(&ctx, "AMY7", WINDOW).await.unwrap();
    assert_eq!(by_id, by_code);

    assert_eq!(by_id.entry.name, "Amina Yusuf");
    assert_eq!(by_id.daily_data.len(), 2);
    let latest = &by_id.daily_data[0];
    assert_eq!(latest.date.to_string(), "2025-08-17");
    assert_eq!(latest.registrations, 1);
    assert_eq!(latest.orders, 1);
    assert_eq!(latest.order_value, 25.0);
    assert_eq!(by_id.daily_data[1].registrations, 1);
    assert_eq!(by_id.daily_data[1].orders, 0);
}

#[tokio::test]
async fn test_profile_of_invalid_or_unknown_referrer_is_not_found() {
    let ctx = common::context().await;
    seed_activity(&ctx.db).await;

    for key in ["TST3", "4", "999", "NOPE"] {
        let err = service::get_profile(&ctx, key, WINDOW).await.unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(_)), "{}", key);
    }
}

#[tokio::test]
async fn test_leaderboard_ranks_by_requested_key() {
    let ctx = common::context().await;
    seed_activity(&ctx.db).await;

    let by_registrations = service::get_leaderboard(&ctx, WINDOW, SrSortKey::Registrations)
        .await
        .unwrap();
    assert_eq!(by_registrations[0].name, "Amina Yusuf");
    assert_eq!(by_registrations[0].rank, 1);
    assert_eq!(by_registrations[0].conversion_rate, 50.0);

    let by_revenue = service::get_leaderboard(&ctx, WINDOW, SrSortKey::Revenue)
        .await
        .unwrap();
    let ranked: Vec<(u32, &str)> = by_revenue
        .iter()
        .map(|e| (e.rank, e.referral_code.as_str()))
        .collect();
    assert_eq!(ranked, vec![(1, "BOK2"), (2, "AMY7")]);

    let by_conversion = service::get_leaderboard(&ctx, WINDOW, SrSortKey::Conversion)
        .await
        .unwrap();
    assert_eq!(by_conversion[0].referral_code, "BOK2");
    assert_eq!(by_conversion[0].conversion_rate, 100.0);
}

#[tokio::test]
async fn test_dashboard_summary_counts_paid_orders() {
    let ctx = common::context().await;
    seed_activity(&ctx.db).await;

    let summary = service::get_dashboard_summary(&ctx, WINDOW).await.unwrap();

    assert_eq!(summary.total_registrations, 3);
    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.total_order_value, 25.0);
    assert_eq!(summary.total_active_srs, 2);
    assert_eq!(summary.average_order_value, 25.0);
    assert_eq!(summary.conversion_rate, 33.3);
}

#[tokio::test]
async fn test_dashboard_trends_are_oldest_first() {
    let ctx = common::context().await;
    seed_activity(&ctx.db).await;

    let points = service::get_trends(&ctx, WINDOW).await.unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date.to_string(), "2025-08-16");
    assert_eq!(points[0].registrations, 1);
    assert_eq!(points[0].orders, 0);
    assert_eq!(points[1].registrations, 2);
    assert_eq!(points[1].orders, 2);
    assert_eq!(points[1].revenue, 55.0);
}

#[tokio::test]
async fn test_detailed_export_rows() {
    let ctx = common::context().await;
    seed_activity(&ctx.db).await;

    let export = service::get_export(&ctx, WINDOW, ExportDetail::Detailed)
        .await
        .unwrap();
    let SrExport::Detailed(rows) = export else {
        panic!("expected detailed rows");
    };

    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.sr_code != "TST3"));

    // newest customer first, customers without orders keep one row
    assert_eq!(rows[0].customer_name.as_deref(), Some("Customer 2"));
    assert_eq!(rows[0].order_id, None);
    assert_eq!(rows[1].order_id, Some(1));
    assert_eq!(rows[1].order_value, Some(25.0));
    assert_eq!(rows[1].order_status, Some(OrderStatus::Delivered));
    assert_eq!(rows[2].order_status, Some(OrderStatus::Cancelled));
    assert_eq!(rows[3].sr_code, "BOK2");

    let csv = to_csv(&rows).unwrap();
    assert!(csv.starts_with("sr_name,sr_code,customer_name,customer_phone,registration_date"));
    assert_eq!(csv.lines().count(), 5);
}

#[tokio::test]
async fn test_summary_export_matches_roster() {
    let ctx = common::context().await;
    seed_activity(&ctx.db).await;

    let export = service::get_export(&ctx, WINDOW, ExportDetail::Summary)
        .await
        .unwrap();
    let roster = service::get_roster(&ctx, WINDOW).await.unwrap();

    assert_eq!(export, SrExport::Summary(roster));
}
