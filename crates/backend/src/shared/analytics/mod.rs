//! Shared aggregation machinery used by every dashboard: range tokens,
//! referrer validity, SQL dialect helpers, metric derivation and execution.

pub mod classifier;
pub mod date_window;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod fragments;
pub mod metrics;
pub mod ranking;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

pub use classifier::{ReferrerRules, DEFAULT_RULES};
pub use date_window::{DateWindow, SqlPredicate, TokenPolicy};
pub use dialect::SqlDialect;
pub use error::{AggregationError, DashboardError, RangeError};
pub use executor::{Aggregator, MetricFamily};
pub use metrics::{DerivationSpec, FieldSpec, TypedMetrics};

/// What a dashboard service needs to run aggregations
#[derive(Clone)]
pub struct AnalyticsContext {
    pub db: DatabaseConnection,
    pub rules: Arc<ReferrerRules>,
    pub token_policy: TokenPolicy,
    pub query_timeout: Duration,
}

impl AnalyticsContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            rules: Arc::new(ReferrerRules::default()),
            token_policy: TokenPolicy::default(),
            query_timeout: Duration::from_secs(30),
        }
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.db, self.query_timeout)
    }

    /// Resolve a range token under the configured policy
    pub fn window(&self, token: &str) -> Result<DateWindow, RangeError> {
        DateWindow::resolve(token, self.token_policy)
    }
}

/// Parse a `YYYY-MM-DD` bucket produced by `SqlDialect::day`
pub fn parse_bucket_date(text: Option<String>) -> Option<NaiveDate> {
    let text = text?;
    match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!("Skipping row with unparsable day bucket `{}`", text);
            None
        }
    }
}

/// English weekday name of a bucket date
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}
