pub mod application;
pub mod health;
pub mod openapi;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::{require_admin, AdminCredential},
    headers::{permissive_cors, with_security_headers},
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Values the router needs beyond the shared state.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub admin: AdminCredential,
    pub public_rps: u32,
    pub admin_rps: u32,
}

pub fn router(state: AppState, settings: RouterSettings) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi::openapi_json));

    let public_api = Router::new()
        .route("/api/applications", post(application::create_application))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(settings.public_rps),
            rps_middleware,
        ));

    let admin_api = Router::new()
        .route("/api/applications", get(application::list_applications))
        .route(
            "/api/applications/stats",
            get(application::application_stats),
        )
        .route(
            "/api/applications/:id",
            get(application::get_application)
                .patch(application::update_application_status)
                .delete(application::delete_application),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            settings.admin,
            require_admin,
        ))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(settings.admin_rps),
            rps_middleware,
        ));

    let app = base_routes
        .merge(public_api)
        .merge(admin_api)
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    with_security_headers(app)
}
