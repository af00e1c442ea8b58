use std::sync::Arc;

use crate::shared::analytics::AnalyticsContext;
use crate::system::auth::AuthState;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub analytics: AnalyticsContext,
    pub auth: Arc<AuthState>,
}
