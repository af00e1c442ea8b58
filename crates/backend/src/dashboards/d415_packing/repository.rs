use contracts::enums::OrderStatus;

use crate::shared::analytics::fragments::{lifecycle_minutes, lifecycle_table, status_list};
use crate::shared::analytics::{
    AggregationError, AnalyticsContext, DateWindow, DerivationSpec, FieldSpec, MetricFamily,
    TypedMetrics,
};

pub static PERFORMANCE_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::int("id"),
    FieldSpec::text("name"),
    FieldSpec::text("email"),
    FieldSpec::int("total_orders_packed"),
    FieldSpec::int("orders_shipped"),
    FieldSpec::int("orders_delivered"),
    FieldSpec::int("orders_returned"),
    FieldSpec::percent("success_rate", "orders_delivered", "total_orders_packed", 2),
    FieldSpec::average(
        "avg_packing_time_minutes",
        "packing_minutes_total",
        "timed_packs",
        2,
    ),
    FieldSpec::int("active_days"),
]);

pub static TREND_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::text("bucket_date"),
    FieldSpec::int("packer_id"),
    FieldSpec::text("packer_name"),
    FieldSpec::int("orders_packed"),
    FieldSpec::int("orders_shipped"),
]);

/// Every active packer with the orders they packed in the window.
/// Packing time runs from "received" to "processed".
pub async fn performance(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::PackingPerformance;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let predicate = window.predicate("o.created_at");
    let minutes = lifecycle_minutes(dialect, "lc");

    let sql = format!(
        r#"
        SELECT
            p.id AS id,
            p.name AS name,
            p.email AS email,
            COUNT(DISTINCT o.id) AS total_orders_packed,
            COUNT(DISTINCT CASE WHEN o.active_status IN {shipped} THEN o.id END) AS orders_shipped,
            COUNT(DISTINCT CASE WHEN o.active_status = '{delivered}' THEN o.id END) AS orders_delivered,
            COUNT(DISTINCT CASE WHEN o.active_status = '{returned}' THEN o.id END) AS orders_returned,
            COUNT(DISTINCT {day}) AS active_days,
            COALESCE(SUM({minutes}), 0) AS packing_minutes_total,
            COUNT({minutes}) AS timed_packs
        FROM packing_staff p
        LEFT JOIN orders o ON o.packer_id = p.id{window}
        LEFT JOIN ({lifecycle}) lc ON lc.order_id = o.id
        WHERE p.status = 1
        GROUP BY p.id, p.name, p.email
        ORDER BY p.id
        "#,
        shipped = status_list(&OrderStatus::shipped_or_later()),
        delivered = OrderStatus::Delivered.code(),
        returned = OrderStatus::Returned.code(),
        day = dialect.day("o.created_at"),
        minutes = minutes,
        window = predicate.and_clause(),
        lifecycle = lifecycle_table(OrderStatus::Received, OrderStatus::Processed),
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

/// Orders packed and shipped per packer per day, most recent first
pub async fn daily_packing(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::PackingTrend;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let day = dialect.day("o.created_at");
    let predicate = window.predicate("o.created_at");

    let sql = format!(
        r#"
        SELECT
            {day} AS bucket_date,
            p.id AS packer_id,
            p.name AS packer_name,
            COUNT(DISTINCT o.id) AS orders_packed,
            COUNT(DISTINCT CASE WHEN o.active_status IN {shipped} THEN o.id END) AS orders_shipped
        FROM orders o
        JOIN packing_staff p ON o.packer_id = p.id
        WHERE 1 = 1{window}
        GROUP BY {day}, p.id, p.name
        ORDER BY {day} DESC, p.name
        "#,
        day = day,
        shipped = status_list(&OrderStatus::shipped_or_later()),
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
