use super::{handlers, state::AppState};
use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let cors = cors_layer(app_state.config.cors_allowed_origin.as_deref());
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/api/knowledge-map", post(handlers::knowledge_map_handler))
        .route(
            "/api/explain-concept",
            post(handlers::explain_concept_handler),
        )
        .route(
            "/api/chat-about-explanation",
            post(handlers::chat_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Restricts CORS to the configured frontend origin when one is set and
/// parses as a header value; otherwise any origin is allowed.
fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let layer = match allowed_origin.and_then(|origin| origin.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new().allow_origin(origin),
        None => CorsLayer::new().allow_origin(Any),
    };
    layer
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
