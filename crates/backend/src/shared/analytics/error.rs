use thiserror::Error;

use super::executor::MetricFamily;

/// A range token that cannot be turned into a window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid range token `{token}`: {reason}")]
    InvalidRangeToken { token: String, reason: String },
}

impl RangeError {
    pub fn invalid(token: &str, reason: impl Into<String>) -> Self {
        RangeError::InvalidRangeToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure while executing an aggregation against the store.
///
/// Never converted into an all-zero result; callers surface it as retryable.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("{family} aggregation failed for window {window}: {source}")]
    Store {
        family: MetricFamily,
        window: String,
        #[source]
        source: sea_orm::DbErr,
    },
    #[error("{family} aggregation timed out after {seconds}s for window {window}")]
    Timeout {
        family: MetricFamily,
        window: String,
        seconds: u64,
    },
    #[error("{family} aggregation is not supported on the {backend} backend")]
    UnsupportedBackend {
        family: MetricFamily,
        backend: String,
    },
}

impl AggregationError {
    pub fn family(&self) -> MetricFamily {
        match self {
            AggregationError::Store { family, .. }
            | AggregationError::Timeout { family, .. }
            | AggregationError::UnsupportedBackend { family, .. } => *family,
        }
    }

    /// Store and timeout failures may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AggregationError::UnsupportedBackend { .. })
    }
}

/// Everything a dashboard service can fail with
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error("{0} not found")]
    NotFound(String),
}
