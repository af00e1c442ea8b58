use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::api_error::ApiErrorBody;

use crate::shared::analytics::{AggregationError, DashboardError, RangeError};

/// Error returned by API handlers, rendered as `ApiErrorBody`
#[derive(Debug)]
pub enum ApiError {
    /// Malformed range token: fix the request, do not retry
    InvalidRange(RangeError),
    /// Store failure or timeout: a retry may succeed
    Unavailable(AggregationError),
    NotFound(String),
    Unauthorized,
    Forbidden,
    TooManyAttempts { retry_after_secs: u64 },
    Internal(String),
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::Range(e) => ApiError::InvalidRange(e),
            DashboardError::Aggregation(e) => ApiError::Unavailable(e),
            DashboardError::NotFound(what) => ApiError::NotFound(what),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::TooManyAttempts { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ApiErrorBody {
        let (error, message, retryable) = match self {
            ApiError::InvalidRange(e) => ("invalid_range", e.to_string(), false),
            ApiError::Unavailable(e) => (
                "metrics_unavailable",
                format!("Metrics are temporarily unavailable ({})", e.family()),
                e.is_retryable(),
            ),
            ApiError::NotFound(what) => ("not_found", format!("{} not found", what), false),
            ApiError::Unauthorized => ("unauthorized", "Sign in required".to_string(), false),
            ApiError::Forbidden => ("forbidden", "Admin access required".to_string(), false),
            ApiError::TooManyAttempts { retry_after_secs } => (
                "too_many_attempts",
                format!("Too many failed attempts, try again in {}s", retry_after_secs),
                true,
            ),
            ApiError::Internal(_) => ("internal", "Internal server error".to_string(), false),
        };
        ApiErrorBody {
            error: error.to_string(),
            message,
            retryable,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Unavailable(e) => tracing::error!("Aggregation unavailable: {}", e),
            ApiError::Internal(e) => tracing::error!("Internal error: {}", e),
            ApiError::InvalidRange(e) => tracing::info!("Rejected request: {}", e),
            _ => {}
        }

        let mut response = (self.status(), Json(self.body())).into_response();
        if let ApiError::TooManyAttempts { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::analytics::MetricFamily;

    #[test]
    fn test_range_errors_are_not_retryable() {
        let err = ApiError::from(DashboardError::Range(RangeError::invalid(
            "custom:2025-08-01",
            "expected custom:<YYYY-MM-DD>:<YYYY-MM-DD>",
        )));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = err.body();
        assert_eq!(body.error, "invalid_range");
        assert!(!body.retryable);
        assert!(body.message.contains("custom:2025-08-01"));
    }

    #[test]
    fn test_timeouts_are_retryable_service_unavailable() {
        let err = ApiError::from(DashboardError::Aggregation(AggregationError::Timeout {
            family: MetricFamily::SalesSummary,
            window: "7d".into(),
            seconds: 30,
        }));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.body().retryable);
        assert!(err.body().message.contains("sales_summary"));
    }
}
