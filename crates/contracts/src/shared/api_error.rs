use serde::{Deserialize, Serialize};

/// Error body returned by every failing API call.
///
/// `retryable` tells the client whether to show a retry affordance
/// (store failures) or to fix the request (bad range token).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
    pub retryable: bool,
}
