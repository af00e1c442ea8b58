use contracts::enums::OrderStatus;

use crate::shared::analytics::fragments::{lifecycle_minutes, lifecycle_table};
use crate::shared::analytics::{
    AggregationError, AnalyticsContext, DateWindow, DerivationSpec, FieldSpec, MetricFamily,
    TypedMetrics,
};

pub static PERFORMANCE_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::int("id"),
    FieldSpec::text("name"),
    FieldSpec::text("mobile"),
    FieldSpec::int("total_orders_assigned"),
    FieldSpec::int("delivered_count"),
    FieldSpec::int("out_for_delivery_count"),
    FieldSpec::percent(
        "delivery_success_rate",
        "delivered_count",
        "total_orders_assigned",
        2,
    ),
    FieldSpec::average(
        "avg_delivery_time_minutes",
        "delivery_minutes_total",
        "timed_deliveries",
        2,
    ),
    FieldSpec::int("active_days"),
    FieldSpec::average(
        "avg_orders_per_day",
        "total_orders_assigned",
        "active_days",
        2,
    ),
]);

pub static TREND_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::text("bucket_date"),
    FieldSpec::int("driver_id"),
    FieldSpec::text("driver_name"),
    FieldSpec::int("delivered"),
]);

/// Every active driver with the orders assigned to them in the window.
/// Delivery time runs from "out for delivery" to "delivered".
pub async fn performance(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::DriverPerformance;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let predicate = window.predicate("o.created_at");
    let minutes = lifecycle_minutes(dialect, "lc");

    let sql = format!(
        r#"
        SELECT
            d.id AS id,
            d.name AS name,
            d.mobile AS mobile,
            COUNT(DISTINCT o.id) AS total_orders_assigned,
            COUNT(DISTINCT CASE WHEN o.active_status = '{delivered}' THEN o.id END) AS delivered_count,
            COUNT(DISTINCT CASE WHEN o.active_status = '{out}' THEN o.id END) AS out_for_delivery_count,
            COUNT(DISTINCT {day}) AS active_days,
            COALESCE(SUM({minutes}), 0) AS delivery_minutes_total,
            COUNT({minutes}) AS timed_deliveries
        FROM delivery_boys d
        LEFT JOIN orders o ON o.delivery_boy_id = d.id{window}
        LEFT JOIN ({lifecycle}) lc ON lc.order_id = o.id
        WHERE d.status = 1
        GROUP BY d.id, d.name, d.mobile
        ORDER BY d.id
        "#,
        delivered = OrderStatus::Delivered.code(),
        out = OrderStatus::OutForDelivery.code(),
        day = dialect.day("o.created_at"),
        minutes = minutes,
        window = predicate.and_clause(),
        lifecycle = lifecycle_table(OrderStatus::OutForDelivery, OrderStatus::Delivered),
    );

    aggregator
        .run(
            family,
            window,
            dialect.statement(sql, predicate.params),
            &PERFORMANCE_SPEC,
        )
        .await
}

/// Delivered orders per driver per day, most recent first
pub async fn daily_deliveries(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::DriverTrend;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let day = dialect.day("o.created_at");
    let predicate = window.predicate("o.created_at");

    let sql = format!(
        r#"
        SELECT
            {day} AS bucket_date,
            d.id AS driver_id,
            d.name AS driver_name,
            COUNT(DISTINCT o.id) AS delivered
        FROM orders o
        JOIN delivery_boys d ON o.delivery_boy_id = d.id
        WHERE o.active_status = '{delivered}'{window}
        GROUP BY {day}, d.id, d.name
        ORDER BY {day} DESC, d.name
        "#,
        day = day,
        delivered = OrderStatus::Delivered.code(),
        window = predicate.and_clause(),
    );

    aggregator
        .run(
            family,
            window,
            dialect.statement(sql, predicate.params),
            &TREND_SPEC,
        )
        .await
}
