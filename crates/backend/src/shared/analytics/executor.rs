use std::fmt;
use std::time::{Duration, Instant};

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use super::date_window::DateWindow;
use super::dialect::SqlDialect;
use super::error::AggregationError;
use super::metrics::{DerivationSpec, RawRow, TypedMetrics};

/// Named aggregation queries, used for logging and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricFamily {
    RegistrationSummary,
    RegistrationTrend,
    RegistrationSources,
    SalesSummary,
    SalesTrend,
    SrRoster,
    SrDailyActivity,
    SrDashboardSummary,
    SrExport,
    DriverPerformance,
    DriverTrend,
    CsrPerformance,
    CsrTrend,
    PackingPerformance,
    PackingTrend,
}

impl MetricFamily {
    pub fn name(&self) -> &'static str {
        match self {
            MetricFamily::RegistrationSummary => "registration_summary",
            MetricFamily::RegistrationTrend => "registration_trend",
            MetricFamily::RegistrationSources => "registration_sources",
            MetricFamily::SalesSummary => "sales_summary",
            MetricFamily::SalesTrend => "sales_trend",
            MetricFamily::SrRoster => "sr_roster",
            MetricFamily::SrDailyActivity => "sr_daily_activity",
            MetricFamily::SrDashboardSummary => "sr_dashboard_summary",
            MetricFamily::SrExport => "sr_export",
            MetricFamily::DriverPerformance => "driver_performance",
            MetricFamily::DriverTrend => "driver_trend",
            MetricFamily::CsrPerformance => "csr_performance",
            MetricFamily::CsrTrend => "csr_trend",
            MetricFamily::PackingPerformance => "packing_performance",
            MetricFamily::PackingTrend => "packing_trend",
        }
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs aggregation statements with a deadline and turns driver rows into
/// metrics. A failure is always an error, never an empty result.
pub struct Aggregator<'a> {
    db: &'a DatabaseConnection,
    timeout: Duration,
}

impl<'a> Aggregator<'a> {
    pub fn new(db: &'a DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    pub fn dialect(&self, family: MetricFamily) -> Result<SqlDialect, AggregationError> {
        let backend = self.db.get_database_backend();
        SqlDialect::from_backend(backend).ok_or_else(|| AggregationError::UnsupportedBackend {
            family,
            backend: format!("{:?}", backend),
        })
    }

    /// Execute `statement` and read `columns` out of every row
    pub async fn fetch_rows(
        &self,
        family: MetricFamily,
        window: &DateWindow,
        statement: Statement,
        columns: &[&str],
    ) -> Result<Vec<RawRow>, AggregationError> {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.db.query_all(statement)).await;

        match outcome {
            Err(_) => {
                tracing::error!(
                    "{} timed out after {:?} (window {})",
                    family,
                    self.timeout,
                    window
                );
                Err(AggregationError::Timeout {
                    family,
                    window: window.to_string(),
                    seconds: self.timeout.as_secs(),
                })
            }
            Ok(Err(e)) => {
                tracing::error!("{} failed (window {}): {}", family, window, e);
                Err(AggregationError::Store {
                    family,
                    window: window.to_string(),
                    source: e,
                })
            }
            Ok(Ok(rows)) => {
                tracing::debug!(
                    "{}: {} rows in {}ms (window {})",
                    family,
                    rows.len(),
                    started.elapsed().as_millis(),
                    window
                );
                Ok(rows
                    .iter()
                    .map(|row| RawRow::from_query_result(row, columns))
                    .collect())
            }
        }
    }

    /// Execute and derive every row through `spec`
    pub async fn run(
        &self,
        family: MetricFamily,
        window: &DateWindow,
        statement: Statement,
        spec: &DerivationSpec,
    ) -> Result<Vec<TypedMetrics>, AggregationError> {
        let rows = self
            .fetch_rows(family, window, statement, &spec.raw_columns())
            .await?;
        Ok(spec.derive_all(&rows))
    }

    /// Single-row aggregate. No row at all derives to all zeros, which is
    /// the legitimate "no data in window" answer.
    pub async fn run_one(
        &self,
        family: MetricFamily,
        window: &DateWindow,
        statement: Statement,
        spec: &DerivationSpec,
    ) -> Result<TypedMetrics, AggregationError> {
        let rows = self
            .fetch_rows(family, window, statement, &spec.raw_columns())
            .await?;
        let first = rows.into_iter().next().unwrap_or_default();
        Ok(spec.derive(&first))
    }
}
