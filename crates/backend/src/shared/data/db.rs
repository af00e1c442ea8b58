use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection};

use super::schema;
use crate::shared::config::DatabaseConfig;

/// Open the connection pool described by `config`.
///
/// Only MySQL and SQLite are accepted: the aggregation SQL is written for
/// those two dialects.
pub async fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    if let Some(path) = sqlite_file_path(&config.url) {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .sqlx_logging(false);

    let conn = Database::connect(options).await?;

    match conn.get_database_backend() {
        DatabaseBackend::MySql | DatabaseBackend::Sqlite => {}
        other => anyhow::bail!("Unsupported database backend {:?}", other),
    }

    if config.bootstrap_schema {
        if conn.get_database_backend() == DatabaseBackend::Sqlite {
            schema::bootstrap(&conn).await?;
            tracing::info!("SQLite schema ensured");
        } else {
            tracing::warn!("bootstrap_schema is ignored for non-SQLite databases");
        }
    }

    tracing::info!("Database connected ({:?})", conn.get_database_backend());
    Ok(conn)
}

/// File path of a `sqlite://` URL, `None` for in-memory or other schemes
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next()?;
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite://target/db/app.db?mode=rwc"),
            Some("target/db/app.db")
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("mysql://u:p@localhost/shop"), None);
    }
}
