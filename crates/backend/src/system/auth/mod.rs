pub mod extractor;
pub mod jwt;
pub mod lockout;
pub mod middleware;
pub mod password;

use std::sync::Mutex;

use contracts::system::auth::Role;

use lockout::LockoutTracker;

pub const JWT_SECRET_ENV: &str = "SR_DASHBOARD_JWT_SECRET";
pub const VIEWER_HASH_ENV: &str = "SR_DASHBOARD_VIEWER_PASSWORD_HASH";
pub const ADMIN_HASH_ENV: &str = "SR_DASHBOARD_ADMIN_PASSWORD_HASH";

/// Shared secrets. Passwords are stored only as argon2 PHC strings.
#[derive(Clone)]
pub struct AuthSecrets {
    pub jwt_secret: String,
    pub viewer_password_hash: String,
    /// Without it nobody can sign in as admin
    pub admin_password_hash: Option<String>,
}

impl std::fmt::Debug for AuthSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSecrets")
            .field("admin_configured", &self.admin_password_hash.is_some())
            .finish_non_exhaustive()
    }
}

impl AuthSecrets {
    pub fn from_env() -> anyhow::Result<Self> {
        let required = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} must be set", name))
        };

        let secrets = Self {
            jwt_secret: required(JWT_SECRET_ENV)?,
            viewer_password_hash: required(VIEWER_HASH_ENV)?,
            admin_password_hash: required(ADMIN_HASH_ENV).ok(),
        };
        if secrets.admin_password_hash.is_none() {
            tracing::warn!("{} is not set, admin sign-in is disabled", ADMIN_HASH_ENV);
        }
        Ok(secrets)
    }

    pub fn password_hash(&self, role: Role) -> Option<&str> {
        match role {
            Role::Viewer => Some(self.viewer_password_hash.as_str()),
            Role::Admin => self.admin_password_hash.as_deref(),
        }
    }
}

/// Authentication state shared by the login handler and the middleware
#[derive(Debug)]
pub struct AuthState {
    pub secrets: AuthSecrets,
    pub token_lifetime: chrono::Duration,
    pub lockout: Mutex<LockoutTracker>,
}

impl AuthState {
    pub fn new(secrets: AuthSecrets, token_lifetime_hours: i64) -> Self {
        Self {
            secrets,
            token_lifetime: chrono::Duration::hours(token_lifetime_hours),
            lockout: Mutex::new(LockoutTracker::default()),
        }
    }
}
