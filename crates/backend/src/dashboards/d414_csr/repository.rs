use crate::shared::analytics::dialect::literal_list;
use crate::shared::analytics::{
    AggregationError, AnalyticsContext, DateWindow, DerivationSpec, FieldSpec, MetricFamily,
    TypedMetrics,
};

/// `csr_interactions.interaction_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    NewOrder,
    Complaint,
    Inquiry,
}

impl InteractionType {
    pub fn code(&self) -> &'static str {
        match self {
            InteractionType::NewOrder => "new_order",
            InteractionType::Complaint => "complaint",
            InteractionType::Inquiry => "inquiry",
        }
    }
}

/// `csr_interactions.outcome`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    OrderPlaced,
    Registered,
    Resolved,
    Unresolved,
}

impl InteractionOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            InteractionOutcome::OrderPlaced => "order_placed",
            InteractionOutcome::Registered => "registered",
            InteractionOutcome::Resolved => "resolved",
            InteractionOutcome::Unresolved => "unresolved",
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, InteractionOutcome::Unresolved)
    }

    pub fn all() -> [InteractionOutcome; 4] {
        [
            InteractionOutcome::OrderPlaced,
            InteractionOutcome::Registered,
            InteractionOutcome::Resolved,
            InteractionOutcome::Unresolved,
        ]
    }
}

pub static PERFORMANCE_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::int("id"),
    FieldSpec::text("name"),
    FieldSpec::text("email"),
    FieldSpec::int("total_interactions"),
    FieldSpec::int("new_order_calls"),
    FieldSpec::int("complaint_calls"),
    FieldSpec::int("inquiry_calls"),
    FieldSpec::int("successful_orders"),
    FieldSpec::int("successful_registrations"),
    FieldSpec::int("complaints_resolved"),
    FieldSpec::money("total_order_value"),
    FieldSpec::average("avg_call_duration", "call_seconds_total", "timed_calls", 2),
    FieldSpec::percent(
        "success_rate",
        "successful_interactions",
        "total_interactions",
        2,
    ),
]);

pub static TREND_SPEC: DerivationSpec = DerivationSpec::new(&[
    FieldSpec::text("bucket_date"),
    FieldSpec::int("csr_id"),
    FieldSpec::text("csr_name"),
    FieldSpec::int("interactions"),
]);

/// Every active CSR with their interactions in the window
pub async fn performance(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::CsrPerformance;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let predicate = window.predicate("i.created_at");

    let successful = literal_list(
        InteractionOutcome::all()
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.code()),
    );

    let sql = format!(
        r#"
        SELECT
            c.id AS id,
            c.name AS name,
            c.email AS email,
            COUNT(i.id) AS total_interactions,
            COUNT(CASE WHEN i.interaction_type = '{new_order}' THEN i.id END) AS new_order_calls,
            COUNT(CASE WHEN i.interaction_type = '{complaint}' THEN i.id END) AS complaint_calls,
            COUNT(CASE WHEN i.interaction_type = '{inquiry}' THEN i.id END) AS inquiry_calls,
            COUNT(CASE WHEN i.outcome = '{order_placed}' THEN i.id END) AS successful_orders,
            COUNT(CASE WHEN i.outcome = '{registered}' THEN i.id END) AS successful_registrations,
            COUNT(CASE WHEN i.interaction_type = '{complaint}' AND i.outcome = '{resolved}' THEN i.id END) AS complaints_resolved,
            COUNT(CASE WHEN i.outcome IN {successful} THEN i.id END) AS successful_interactions,
            COALESCE(SUM(CASE WHEN i.outcome = '{order_placed}' THEN i.order_value END), 0) AS total_order_value,
            COALESCE(SUM(i.duration_seconds), 0) AS call_seconds_total,
            COUNT(i.duration_seconds) AS timed_calls
        FROM csr_staff c
        LEFT JOIN csr_interactions i ON i.csr_id = c.id{window}
        WHERE c.status = 1
        GROUP BY c.id, c.name, c.email
        ORDER BY c.id
        "#,
        new_order = InteractionType::NewOrder.code(),
        complaint = InteractionType::Complaint.code(),
        inquiry = InteractionType::Inquiry.code(),
        order_placed = InteractionOutcome::OrderPlaced.code(),
        registered = InteractionOutcome::Registered.code(),
        resolved = InteractionOutcome::Resolved.code(),
        successful = successful,
        window = predicate.and_clause(),
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

/// Interactions per CSR per day, most recent first
pub async fn daily_interactions(
    ctx: &AnalyticsContext,
    window: &DateWindow,
) -> Result<Vec<TypedMetrics>, AggregationError> {
    let family = MetricFamily::CsrTrend;
    let aggregator = ctx.aggregator();
    let dialect = aggregator.dialect(family)?;
    let day = dialect.day("i.created_at");
    let predicate = window.predicate("i.created_at");

    let sql = format!(
        r#"
        SELECT
            {day} AS bucket_date,
            c.id AS csr_id,
            c.name AS csr_name,
            COUNT(i.id) AS interactions
        FROM csr_interactions i
        JOIN csr_staff c ON i.csr_id = c.id
        WHERE 1 = 1{window}
        GROUP BY {day}, c.id, c.name
        ORDER BY {day} DESC, c.name
        "#,
        day = day,
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
