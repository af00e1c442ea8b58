use contracts::enums::SourceClass;

use crate::shared::analytics::{
    AggregationError, AnalyticsContext, DateWindow, DerivationSpec, FieldSpec, MetricFamily,
    TypedMetrics,
};

pub static SUMMARY_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::int("total_registrations"),
    FieldSpec::int("unique_referral_codes"),
    FieldSpec::int("active_days"),
    FieldSpec::average(
        "avg_registrations_per_day",
        "total_registrations",
        "active_days",
        2,
    ),
    FieldSpec::int("valid_sr_linked_registrations"),
    FieldSpec::int("direct_registrations"),
    FieldSpec::percent(
        "sr_linked_percentage",
        "valid_sr_linked_registrations",
        "total_registrations",
        1,
    ),
]);

pub static TREND_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::text("bucket_date"),
    FieldSpec::int("total_registrations"),
    FieldSpec::int("sr_linked_registrations"),
    FieldSpec::int("direct_registrations"),
]);

pub static SOURCES_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::text("source_code"),
    FieldSpec::int("registrations"),
]);

/// Every user joined to the referrer owning its code, if any
const USERS_WITH_REFERRER: &str =
    "FROM users u LEFT JOIN marketing_persons mp ON u.referral_code = mp.referral_code";

/// Platform-wide registration totals
pub async fn summary(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<TypedMetrics, AggregationError> {
    let family = MetricFamily::RegistrationSummary;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let valid = ctx.rules.valid_flag_sql("mp", dialect);
    let predicate = window.predicate("u.created_at");

    let sql = format!(
        r#"
        SELECT
            COUNT(DISTINCT u.id) AS total_registrations,
            COUNT(DISTINCT NULLIF(u.referral_code, '')) AS unique_referral_codes,
            COUNT(DISTINCT {day}) AS active_days,
            COUNT(DISTINCT CASE WHEN {valid} = 1 THEN u.id END) AS valid_sr_linked_registrations,
            COUNT(DISTINCT CASE WHEN {valid} = 0 THEN u.id END) AS direct_registrations
        {from}
        WHERE 1 = 1{filter}
        "#,
        day = dialect.day("u.created_at"),
        valid = valid,
        from = USERS_WITH_REFERRER,
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

/// One row per calendar day with registrations, most recent first
pub async fn daily_trend(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::RegistrationTrend;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let valid = ctx.rules.valid_flag_sql("mp", dialect);
    let day = dialect.day("u.created_at");
    let predicate = window.predicate("u.created_at");

    let sql = format!(
        r#"
        SELECT
            {day} AS bucket_date,
            COUNT(u.id) AS total_registrations,
            COUNT(CASE WHEN {valid} = 1 THEN u.id END) AS sr_linked_registrations,
            COUNT(CASE WHEN {valid} = 0 THEN u.id END) AS direct_registrations
        {from}
        WHERE 1 = 1{filter}
        GROUP BY {day}
        ORDER BY {day} DESC
        "#,
        day = day,
        valid = valid,
        from = USERS_WITH_REFERRER,
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

/// Registration counts per source bucket. Buckets without registrations
/// are absent.
pub async fn sources(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<(SourceClass, i64)>, AggregationError> {
    let family = MetricFamily::RegistrationSources;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let source = ctx.rules.source_case_sql("mp", "u.referral_code", dialect);
    let predicate = window.predicate("u.created_at");

    let sql = format!(
        r#"
        SELECT
            {source} AS source_code,
            COUNT(u.id) AS registrations
        {from}
        WHERE 1 = 1{filter}
        GROUP BY {source}
        "#,
        source = source,
        from = USERS_WITH_REFERRER,
        filter = predicate.and_clause(),
    );

    let rows = aggregator
        .run(
            family,
            window,
            dialect.statement(sql, predicate.params),
            &SOURCES_SPEC,
        )
        .await?;

    let mut buckets = Vec::with_capacity(rows.len());
    for row in rows {
        let code = row.text("source_code").unwrap_or_default();
        match SourceClass::from_code(&code) {
            Some(class) => buckets.push((class, row.int("registrations"))),
            None => tracing::warn!("D410: unexpected source bucket `{}`", code),
        }
    }
    Ok(buckets)
}
