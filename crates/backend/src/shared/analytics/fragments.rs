//! SQL pieces shared by more than one dashboard

use contracts::enums::OrderStatus;

use super::dialect::{literal_list, SqlDialect};

/// `('2', '3', ...)` for the given statuses
pub fn status_list(statuses: &[OrderStatus]) -> String {
    literal_list(statuses.iter().map(|s| s.code()))
}

/// `o.active_status IN (<fulfilled>)`
pub fn fulfilled_condition(column: &str) -> String {
    format!("{} IN {}", column, status_list(&OrderStatus::fulfilled()))
}

/// Derived table with one row per order: the first time it entered `from`
/// and the last time it entered `to`, as `entered_at` / `reached_at`.
pub fn lifecycle_table(from: OrderStatus, to: OrderStatus) -> String {
    format!(
        "SELECT os.order_id AS order_id, \
         MIN(CASE WHEN os.status = '{from}' THEN os.created_at END) AS entered_at, \
         MAX(CASE WHEN os.status = '{to}' THEN os.created_at END) AS reached_at \
         FROM order_statuses os \
         WHERE os.status IN ('{from}', '{to}') \
         GROUP BY os.order_id",
        from = from.code(),
        to = to.code(),
    )
}

/// Minutes spent between the two lifecycle events, NULL when either is missing
pub fn lifecycle_minutes(dialect: SqlDialect, alias: &str) -> String {
    let entered = format!("{}.entered_at", alias);
    let reached = format!("{}.reached_at", alias);
    format!(
        "CASE WHEN {e} IS NOT NULL AND {r} IS NOT NULL THEN {minutes} END",
        e = entered,
        r = reached,
        minutes = dialect.minutes_between(&entered, &reached),
    )
}
