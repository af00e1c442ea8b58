use crate::shared::analytics::fragments::fulfilled_condition;
use crate::shared::analytics::{
    AggregationError, AnalyticsContext, DateWindow, DerivationSpec, FieldSpec, MetricFamily,
    TypedMetrics,
};

pub static SUMMARY_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::int("total_orders"),
    FieldSpec::money("total_order_value"),
    FieldSpec::money("total_delivery_charges"),
    FieldSpec::money("total_revenue"),
    FieldSpec::int("unique_customers"),
    FieldSpec::int("unique_referral_codes"),
    FieldSpec::average("avg_order_value", "total_revenue", "total_orders", 2),
    FieldSpec::average("avg_order_total", "total_order_value", "total_orders", 2),
    FieldSpec::average("avg_delivery_charge", "total_delivery_charges", "total_orders", 2),
    FieldSpec::int("active_days"),
    FieldSpec::int("sr_linked_orders"),
    FieldSpec::money("sr_linked_order_total"),
    FieldSpec::money("sr_linked_delivery_charges"),
    FieldSpec::money("sr_linked_revenue"),
    FieldSpec::percent("sr_linked_percentage", "sr_linked_orders", "total_orders", 1),
]);

pub static TREND_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::text("bucket_date"),
    FieldSpec::int("total_orders"),
    FieldSpec::money("total_order_value"),
    FieldSpec::money("total_delivery_charges"),
    FieldSpec::money("total_revenue"),
    FieldSpec::int("unique_customers"),
    FieldSpec::average("avg_order_value", "total_revenue", "total_orders", 2),
    FieldSpec::average("avg_order_total", "total_order_value", "total_orders", 2),
    FieldSpec::average("avg_delivery_charge", "total_delivery_charges", "total_orders", 2),
    FieldSpec::int("sr_linked_orders"),
    FieldSpec::money("sr_linked_order_total"),
    FieldSpec::money("sr_linked_delivery_charges"),
    FieldSpec::money("sr_linked_revenue"),
]);

/// Columns shared by the summary and the daily trend
fn totals_columns(valid: &str) -> String {
    format!(
        r#"
            COUNT(DISTINCT o.id) AS total_orders,
            COALESCE(SUM(o.total), 0) AS total_order_value,
            COALESCE(SUM(o.delivery_charge), 0) AS total_delivery_charges,
            COALESCE(SUM(o.total + o.delivery_charge), 0) AS total_revenue,
            COUNT(DISTINCT o.user_id) AS unique_customers,
            COUNT(DISTINCT CASE WHEN {valid} = 1 THEN o.id END) AS sr_linked_orders,
            COALESCE(SUM(CASE WHEN {valid} = 1 THEN o.total END), 0) AS sr_linked_order_total,
            COALESCE(SUM(CASE WHEN {valid} = 1 THEN o.delivery_charge END), 0) AS sr_linked_delivery_charges,
            COALESCE(SUM(CASE WHEN {valid} = 1 THEN o.total + o.delivery_charge END), 0) AS sr_linked_revenue"#,
        valid = valid
    )
}

/// Fulfilled orders with their customer and the customer's referrer
fn fulfilled_orders_from() -> String {
    format!(
        "FROM orders o \
         JOIN users u ON o.user_id = u.id \
         LEFT JOIN marketing_persons mp ON u.referral_code = mp.referral_code \
         WHERE {}",
        fulfilled_condition("o.active_status")
    )
}

/// Fulfilled-order totals for the window. Always exactly one row.
pub async fn summary(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<TypedMetrics, AggregationError> {
    let family = MetricFamily::SalesSummary;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let valid = ctx.rules.valid_flag_sql("mp", dialect);
    let predicate = window.predicate("o.created_at");

    let sql = format!(
        r#"
        SELECT {totals},
            COUNT(DISTINCT NULLIF(u.referral_code, '')) AS unique_referral_codes,
            COUNT(DISTINCT {day}) AS active_days
        {from}{filter}
        "#,
        totals = totals_columns(&valid),
        day = dialect.day("o.created_at"),
        from = fulfilled_orders_from(),
        filter = predicate.and_clause(),
    );

    aggregator
        .run_one(
            family,
            window,
            dialect.statement(sql, predicate.params),
            &SUMMARY_SPEC,
        )
        .await
}

/// One row per day with fulfilled orders, most recent first
pub async fn daily_trend(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::SalesTrend;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let valid = ctx.rules.valid_flag_sql("mp", dialect);
    let day = dialect.day("o.created_at");
    let predicate = window.predicate("o.created_at");

    let sql = format!(
        r#"
        SELECT {day} AS bucket_date, {totals}
        {from}{filter}
        GROUP BY {day}
        ORDER BY {day} DESC
        "#,
        day = day,
        totals = totals_columns(&valid),
        from = fulfilled_orders_from(),
        filter = predicate.and_clause(),
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
