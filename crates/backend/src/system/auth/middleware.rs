use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use contracts::system::auth::TokenClaims;

use crate::api::error::ApiError;
use crate::state::AppState;

/// Middleware that requires valid JWT authentication
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = bearer_claims(&state, &req)?;

    // Add claims to request extensions for use in handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Middleware that requires admin privileges
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = bearer_claims(&state, &req)?;

    if !claims.role.is_admin() {
        tracing::warn!("Admin route {} refused for {}", req.uri().path(), claims.sub);
        return Err(ApiError::Forbidden);
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn bearer_claims(state: &AppState, req: &Request<Body>) -> Result<TokenClaims, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    super::jwt::validate_token(token, &state.auth.secrets.jwt_secret)
        .map_err(|_| ApiError::Unauthorized)
}
