use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use contracts::system::auth::{Role, TokenClaims};

use crate::api::error::ApiError;

/// Claims of the signed-in caller.
///
/// Only available behind `require_auth` / `require_admin`, which store the
/// validated claims in the request extensions.
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    pub fn role(&self) -> Role {
        self.0.role
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<TokenClaims>() {
            Some(claims) => Ok(CurrentUser(claims.clone())),
            None => Err(ApiError::Unauthorized),
        }
    }
}
