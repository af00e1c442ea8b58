use sea_orm::Value;

use crate::shared::analytics::fragments::fulfilled_condition;
use crate::shared::analytics::{
    AggregationError, AnalyticsContext, DateWindow, DerivationSpec, FieldSpec, MetricFamily,
    TypedMetrics,
};

pub static ROSTER_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::int("id"),
    FieldSpec::text("name"),
    FieldSpec::text("referral_code"),
    FieldSpec::text("phone"),
    FieldSpec::text("email"),
    FieldSpec::text("profile_image"),
    FieldSpec::text("join_date"),
    FieldSpec::int("total_customers_registered"),
    FieldSpec::int("total_orders"),
    FieldSpec::money("total_order_value"),
    FieldSpec::percent(
        "conversion_rate",
        "total_orders",
        "total_customers_registered",
        1,
    ),
]);

pub static ACTIVITY_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::text("sr_code"),
    FieldSpec::text("bucket_date"),
    FieldSpec::text("activity"),
    FieldSpec::int("activity_count"),
    FieldSpec::money("activity_value"),
]);

pub static DASHBOARD_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::int("total_registrations"),
    FieldSpec::int("total_orders"),
    FieldSpec::money("total_order_value"),
    FieldSpec::int("total_active_srs"),
    FieldSpec::average("average_order_value", "total_order_value", "total_orders", 2),
    FieldSpec::percent("conversion_rate", "total_orders", "total_registrations", 1),
]);

pub static EXPORT_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::text("sr_name"),
    FieldSpec::text("sr_code"),
    FieldSpec::text("customer_name"),
    FieldSpec::text("customer_phone"),
    FieldSpec::text("registration_date"),
    FieldSpec::optional_int("order_id"),
    FieldSpec::optional_money("order_value"),
    FieldSpec::text("order_date"),
    FieldSpec::text("order_status"),
]);

/// `activity` values of the daily activity union
pub const ACTIVITY_REGISTRATIONS: &str = "registrations";
pub const ACTIVITY_ORDERS: &str = "orders";

/// Which referrers the roster query returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterFilter {
    All,
    /// Numeric id or referral code
    IdOrCode(String),
}

/// Valid referrers with customers registered in the window and their
/// fulfilled orders
pub async fn roster(
    ctx: &AnalyticsContext,
    window: &DateWindow,
    filter: &RosterFilter,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::SrRoster;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let predicate = window.predicate("u.created_at");

    let mut params = predicate.params.clone();
    let filter_sql = match filter {
        RosterFilter::All => String::new(),
        RosterFilter::IdOrCode(key) => {
            params.push(Value::from(key.as_str()));
            params.push(Value::from(key.as_str()));
            format!(" AND ({} = ? OR mp.referral_code = ?)", dialect.text("mp.id"))
        }
    };

    let sql = format!(
        r#"
        SELECT
            mp.id AS id,
            mp.name AS name,
            mp.referral_code AS referral_code,
            mp.mobile AS phone,
            mp.email AS email,
            mp.logo AS profile_image,
            {join_date} AS join_date,
            COUNT(DISTINCT u.id) AS total_customers_registered,
            COUNT(DISTINCT o.id) AS total_orders,
            COALESCE(SUM(o.total + o.delivery_charge), 0) AS total_order_value
        FROM marketing_persons mp
        LEFT JOIN users u ON mp.referral_code = u.referral_code{window}
        LEFT JOIN orders o ON u.id = o.user_id AND {fulfilled}
        WHERE {valid} = 1{filter}
        GROUP BY mp.id, mp.name, mp.referral_code, mp.mobile, mp.email, mp.logo, mp.created_at
        ORDER BY total_customers_registered DESC, mp.name ASC
        "#,
        join_date = dialect.text("mp.created_at"),
        window = predicate.and_clause(),
        fulfilled = fulfilled_condition("o.active_status"),
        valid = ctx.rules.valid_flag_sql("mp", dialect),
        filter = filter_sql,
    );

    aggregator
        .run(family, window, dialect.statement(sql, params), &ROSTER_SPEC)
        .await
}

/// Registrations and fulfilled orders per valid referrer per day.
/// One row per (referrer, day, activity).
pub async fn daily_activity(
    ctx: &AnalyticsContext,
    window: &DateWindow,
    referral_code: Option<&str>,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::SrDailyActivity;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let valid = ctx.rules.valid_flag_sql("mp", dialect);
    let registered = window.predicate("u.created_at");
    let ordered = window.predicate("o.created_at");
    let registered_day = dialect.day("u.created_at");
    let ordered_day = dialect.day("o.created_at");

    let code_filter = if referral_code.is_some() {
        " AND u.referral_code = ?"
    } else {
        ""
    };

    let mut params = registered.params.clone();
    if let Some(code) = referral_code {
        params.push(Value::from(code));
    }
    params.extend(ordered.params.iter().cloned());
    if let Some(code) = referral_code {
        params.push(Value::from(code));
    }

    let sql = format!(
        r#"
        SELECT
            u.referral_code AS sr_code,
            {registered_day} AS bucket_date,
            '{registrations}' AS activity,
            COUNT(u.id) AS activity_count,
            0 AS activity_value
        FROM users u
        JOIN marketing_persons mp ON u.referral_code = mp.referral_code
        WHERE {valid} = 1{registered}{code_filter}
        GROUP BY u.referral_code, {registered_day}
        UNION ALL
        SELECT
            u.referral_code AS sr_code,
            {ordered_day} AS bucket_date,
            '{orders}' AS activity,
            COUNT(DISTINCT o.id) AS activity_count,
            COALESCE(SUM(o.total + o.delivery_charge), 0) AS activity_value
        FROM orders o
        JOIN users u ON o.user_id = u.id
        JOIN marketing_persons mp ON u.referral_code = mp.referral_code
        WHERE {valid} = 1 AND {fulfilled}{ordered}{code_filter}
        GROUP BY u.referral_code, {ordered_day}
        ORDER BY bucket_date DESC, sr_code, activity
        "#,
        registered_day = registered_day,
        ordered_day = ordered_day,
        registrations = ACTIVITY_REGISTRATIONS,
        orders = ACTIVITY_ORDERS,
        valid = valid,
        fulfilled = fulfilled_condition("o.active_status"),
        registered = registered.and_clause(),
        ordered = ordered.and_clause(),
        code_filter = code_filter,
    );

    aggregator
        .run(family, window, dialect.statement(sql, params), &ACTIVITY_SPEC)
        .await
}

/// Headline totals over valid referrers. Orders count only when a
/// successful payment exists.
pub async fn dashboard_summary(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<TypedMetrics, AggregationError> {
    let family = MetricFamily::SrDashboardSummary;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let predicate = window.predicate("u.created_at");

    let sql = format!(
        r#"
        SELECT
            COUNT(DISTINCT u.id) AS total_registrations,
            COUNT(DISTINCT o.id) AS total_orders,
            COALESCE(SUM(o.total + o.delivery_charge), 0) AS total_order_value,
            COUNT(DISTINCT mp.id) AS total_active_srs
        FROM marketing_persons mp
        LEFT JOIN users u ON mp.referral_code = u.referral_code{window}
        LEFT JOIN orders o ON u.id = o.user_id
            AND {fulfilled}
            AND EXISTS (
                SELECT 1 FROM transactions t
                WHERE t.order_id = o.id AND t.status = 'success'
            )
        WHERE {valid} = 1
        "#,
        window = predicate.and_clause(),
        fulfilled = fulfilled_condition("o.active_status"),
        valid = ctx.rules.valid_flag_sql("mp", dialect),
    );

    aggregator
        .run_one(
            family,
            window,
            dialect.statement(sql, predicate.params),
            &DASHBOARD_SPEC,
        )
        .await
}

/// Referrer → customer → order rows for customers registered in the window.
/// Customers without orders appear once with empty order fields.
pub async fn export_rows(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::SrExport;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let predicate = window.predicate("u.created_at");

    let sql = format!(
        r#"
        SELECT
            mp.name AS sr_name,
            mp.referral_code AS sr_code,
            u.name AS customer_name,
            u.mobile AS customer_phone,
            {registration_day} AS registration_date,
            o.id AS order_id,
            o.total + o.delivery_charge AS order_value,
            {order_day} AS order_date,
            {order_status} AS order_status
        FROM marketing_persons mp
        JOIN users u ON mp.referral_code = u.referral_code
        LEFT JOIN orders o ON u.id = o.user_id
        WHERE {valid} = 1{window}
        ORDER BY mp.name, u.created_at DESC, u.id, o.created_at DESC, o.id
        "#,
        registration_day = dialect.day("u.created_at"),
        order_day = dialect.day("o.created_at"),
        order_status = dialect.text("o.active_status"),
        valid = ctx.rules.valid_flag_sql("mp", dialect),
        window = predicate.and_clause(),
    );

    aggregator
        .run(
            family,
            window,
            dialect.statement(sql, predicate.params),
            &EXPORT_SPEC,
        )
        .await
}
