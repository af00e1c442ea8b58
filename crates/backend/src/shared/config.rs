use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::analytics::TokenPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub range: RangeConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Built dashboard UI, served for every non-API path when present
    #[serde(default)]
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// `mysql://...` or `sqlite://...`; `DATABASE_URL` overrides it
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Deadline for a single aggregation query
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
    /// Create the tables on start-up (SQLite only, for local runs)
    #[serde(default)]
    pub bootstrap_schema: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RangeConfig {
    /// Reject unknown range tokens instead of falling back to 7 days
    #[serde(default)]
    pub strict_tokens: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub case_insensitive_substrings: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_token_lifetime_hours")]
    pub token_lifetime_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_lifetime_hours: default_token_lifetime_hours(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_query_timeout_secs() -> u64 {
    30
}

fn default_token_lifetime_hours() -> i64 {
    12
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl RangeConfig {
    pub fn token_policy(&self) -> TokenPolicy {
        if self.strict_tokens {
            TokenPolicy::Strict
        } else {
            TokenPolicy::Lenient
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 5000

[database]
url = "sqlite://target/db/sr-dashboard.db?mode=rwc"
query_timeout_secs = 30
bootstrap_schema = true

[range]
strict_tokens = false

[classifier]
case_insensitive_substrings = false

[auth]
token_lifetime_hours = 12
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `DATABASE_URL` replaces `database.url` in both cases.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = match find_config_file() {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            parse_config(&std::fs::read_to_string(&path)?)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            parse_config(DEFAULT_CONFIG)?
        }
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        if !url.trim().is_empty() {
            tracing::info!("Database URL taken from DATABASE_URL");
            config.database.url = url;
        }
    }

    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

fn find_config_file() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::warn!("config.toml not found at: {}", config_path.display());
        None
    }
}

/// Resolve a relative static directory against the executable directory
pub fn resolve_static_dir(config: &Config) -> Option<PathBuf> {
    let dir = config.server.static_dir.as_deref()?;
    let path = Path::new(dir);
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }
    let resolved = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|d| d.join(path)));
    Some(resolved.unwrap_or_else(|| PathBuf::from(dir)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 5000);
        assert!(config.database.url.starts_with("sqlite://"));
        assert_eq!(config.database.query_timeout(), Duration::from_secs(30));
        assert_eq!(config.range.token_policy(), TokenPolicy::Lenient);
        assert!(!config.classifier.case_insensitive_substrings);
        assert_eq!(config.auth.token_lifetime_hours, 12);
    }

    #[test]
    fn test_optional_sections_default() {
        let config = parse_config(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "mysql://app:secret@db/shop"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.max_connections, 10);
        assert!(!config.database.bootstrap_schema);
        assert!(!config.range.strict_tokens);
        assert_eq!(config.auth.token_lifetime_hours, 12);
        assert_eq!(config.server.static_dir, None);
    }

    #[test]
    fn test_strict_tokens_switch_policy() {
        let range = RangeConfig { strict_tokens: true };
        assert_eq!(range.token_policy(), TokenPolicy::Strict);
    }
}
