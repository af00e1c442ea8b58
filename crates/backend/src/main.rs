use std::io::BufRead;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use backend::shared::analytics::{AnalyticsContext, ReferrerRules};
use backend::shared::config::{load_config, resolve_static_dir};
use backend::shared::data::db::initialize_database;
use backend::state::AppState;
use backend::system::auth::{password, AuthSecrets, AuthState};
use backend::system::middleware::request_logger::request_logger;
use backend::{routes, system};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `sr-dashboard hash-password` reads a password from stdin and prints
    // the PHC string to put into the *_PASSWORD_HASH variables
    if let Some(command) = std::env::args().nth(1) {
        return match command.as_str() {
            "hash-password" => print_password_hash(),
            other => Err(anyhow::anyhow!("Unknown command `{}`", other)),
        };
    }

    system::tracing::initialize()?;

    let config = load_config()?;
    let secrets = AuthSecrets::from_env()?;

    let db = initialize_database(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let rules = ReferrerRules {
        case_insensitive_substrings: config.classifier.case_insensitive_substrings,
        ..ReferrerRules::default()
    };

    let state = AppState {
        analytics: AnalyticsContext {
            db,
            rules: Arc::new(rules),
            token_policy: config.range.token_policy(),
            query_timeout: config.database.query_timeout(),
        },
        auth: Arc::new(AuthState::new(secrets, config.auth.token_lifetime_hours)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let mut app = routes::configure_routes(state);
    if let Some(dir) = resolve_static_dir(&config) {
        tracing::info!("Serving dashboard UI from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app.layer(middleware::from_fn(request_logger)).layer(cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("Port {} is already in use", config.server.port);
            } else {
                tracing::error!("Failed to bind to {}: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn print_password_hash() -> anyhow::Result<()> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("Empty password");
    }
    println!("{}", password::hash_password(password)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
