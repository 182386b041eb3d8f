use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::{handlers, middleware::cors_middleware};
use crate::AppState;

pub fn create_router() -> Router<AppState> {
    // Device listing
    let device_routes = Router::new().route("/", get(handlers::devices::list_devices));

    // Preference routes
    let preference_routes = Router::new()
        .route("/preferences", post(handlers::preferences::create_preference))
        .route("/preferences/:id", get(handlers::preferences::get_preference))
        .route(
            "/preferences/by-username/",
            get(handlers::preferences::missing_username),
        )
        // Catch-alls so extra segments and trailing slashes reach the
        // handler and come back as 400s.
        .route(
            "/preferences/by-username/*username",
            get(handlers::preferences::get_preference_by_username),
        )
        .route(
            "/preferences/update/",
            any(handlers::preferences::update_preference),
        )
        .route(
            "/preferences/update/*id",
            any(handlers::preferences::update_preference),
        );

    device_routes.merge(preference_routes)
}

/// Full application: API routes, health check and the shared layers.
pub fn create_app(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .merge(create_router())
        .layer(middleware::from_fn_with_state(state.clone(), cors_middleware))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
