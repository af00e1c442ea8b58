use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use contracts::system::auth::{Role, TokenClaims};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// Issue an HS256 access token for `role`; returns the token and its expiry
pub fn generate_access_token(
    role: Role,
    secret: &str,
    lifetime: Duration,
    now: DateTime<Utc>,
) -> Result<(String, DateTime<Utc>)> {
    let expires_at = now + lifetime;
    let claims = TokenClaims {
        sub: role_name(role).to_string(),
        role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")?;

    Ok((token, expires_at))
}

/// Validate JWT token and extract claims
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Viewer => "viewer",
        Role::Admin => "admin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-with-enough-entropy";

    #[test]
    fn test_token_round_trip_keeps_role() {
        let (token, expires_at) =
            generate_access_token(Role::Admin, SECRET, Duration::hours(1), Utc::now()).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, expires_at.timestamp() as usize);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let (token, _) =
            generate_access_token(Role::Viewer, SECRET, Duration::hours(1), Utc::now()).unwrap();
        assert!(validate_token(&token, "another-secret").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issued = Utc::now() - Duration::hours(3);
        let (token, _) =
            generate_access_token(Role::Viewer, SECRET, Duration::hours(1), issued).unwrap();
        assert!(validate_token(&token, SECRET).is_err());
    }
}
