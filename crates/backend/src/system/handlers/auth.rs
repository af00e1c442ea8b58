use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Json, State};
use chrono::Utc;
use contracts::system::auth::{LoginRequest, LoginResponse, Role};

use crate::api::error::ApiError;
use crate::state::AppState;
use crate::system::auth::{jwt, password};

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    client: Option<ConnectInfo<SocketAddr>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let client = client
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "local".to_string());
    let role = request.role.unwrap_or(Role::Viewer);
    let now = Instant::now();

    {
        let lockout = state
            .auth
            .lockout
            .lock()
            .map_err(|_| ApiError::Internal("lockout state poisoned".into()))?;
        if let Err(remaining) = lockout.check(&client, now) {
            return Err(ApiError::TooManyAttempts {
                retry_after_secs: remaining.as_secs().max(1),
            });
        }
    }

    let accepted = match state.auth.secrets.password_hash(role) {
        Some(hash) => password::verify_password(&request.password, hash)?,
        None => false,
    };

    let mut lockout = state
        .auth
        .lockout
        .lock()
        .map_err(|_| ApiError::Internal("lockout state poisoned".into()))?;

    if !accepted {
        tracing::warn!("Failed {:?} sign-in from {}", role, client);
        return match lockout.record_failure(&client, now) {
            Some(duration) => Err(ApiError::TooManyAttempts {
                retry_after_secs: duration.as_secs(),
            }),
            None => Err(ApiError::Unauthorized),
        };
    }
    lockout.record_success(&client);
    drop(lockout);

    let (access_token, expires_at) = jwt::generate_access_token(
        role,
        &state.auth.secrets.jwt_secret,
        state.auth.token_lifetime,
        Utc::now(),
    )?;

    tracing::info!("{:?} signed in from {}", role, client);

    Ok(Json(LoginResponse {
        access_token,
        role,
        expires_at: expires_at.to_rfc3339(),
    }))
}
