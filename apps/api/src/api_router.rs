use axum::Router;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(app_state: AppState) -> Router {
    let service_routes = Router::new()
        .route(
            "/api/services/{service}/invocations",
            post(handlers::services::invoke_service_handler),
        )
        .route(
            "/api/services/{service}/init",
            post(handlers::services::init_service_handler),
        );

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(service_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state)
}
