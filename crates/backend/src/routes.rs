use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::state::AppState;
use crate::system;
use crate::system::auth::middleware::{require_admin, require_auth};

/// All application routes
pub fn configure_routes(state: AppState) -> Router {
    // ========================================
    // METRICS (any signed-in role)
    // ========================================
    let metrics = Router::new()
        // D410 Registrations
        .route(
            "/api/registrations/summary",
            get(handlers::d410_registrations::get_summary),
        )
        .route(
            "/api/registrations/trends",
            get(handlers::d410_registrations::get_trends),
        )
        .route(
            "/api/registrations/sources",
            get(handlers::d410_registrations::get_sources),
        )
        // D411 Sales
        .route("/api/sales/summary", get(handlers::d411_sales::get_summary))
        .route("/api/sales/trends", get(handlers::d411_sales::get_trends))
        // D412 SR performance
        .route("/api/srs", get(handlers::d412_sr_performance::list_srs))
        .route("/api/srs/:id", get(handlers::d412_sr_performance::get_sr))
        .route(
            "/api/leaderboard",
            get(handlers::d412_sr_performance::get_leaderboard),
        )
        .route(
            "/api/dashboard/summary",
            get(handlers::d412_sr_performance::get_dashboard_summary),
        )
        .route(
            "/api/dashboard/trends",
            get(handlers::d412_sr_performance::get_dashboard_trends),
        )
        // D413 Drivers
        .route("/api/drivers", get(handlers::d413_drivers::get_performance))
        .route("/api/drivers/trends", get(handlers::d413_drivers::get_trends))
        // D414 CSR
        .route("/api/csr", get(handlers::d414_csr::get_performance))
        .route("/api/csr/trends", get(handlers::d414_csr::get_trends))
        // D415 Packing
        .route("/api/packing", get(handlers::d415_packing::get_performance))
        .route("/api/packing/trends", get(handlers::d415_packing::get_trends))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // ========================================
    // ADMIN
    // ========================================
    let admin = Router::new()
        .route("/api/export", get(handlers::d412_sr_performance::export))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/auth/login", post(system::handlers::auth::login))
        .merge(metrics)
        .merge(admin)
        .with_state(state)
}
