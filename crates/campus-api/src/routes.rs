//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, request tracing, a body size limit
//! and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use campus_core::config::CampusConfig;
use campus_core::error::{CampusError, Result};

use crate::handlers;
use crate::state::AppState;

/// Request bodies are single chat messages.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The browser front-end is served from localhost on the API port or the
    // next one up (dev server).
    let port = state.config.general.port;
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| HeaderValue::from_str(&origin).ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let conversation_routes = Router::new()
        .route(
            "/conversations",
            get(handlers::list_conversations).post(handlers::create_conversation),
        )
        .route(
            "/conversations/{id}",
            axum::routing::delete(handlers::delete_conversation),
        )
        .route("/conversations/{id}/messages", post(handlers::send_message))
        .route("/conversations/{id}/transcript", get(handlers::get_transcript))
        .route("/conversations/{id}/context", get(handlers::get_context))
        .route("/conversations/{id}/reset", post(handlers::reset_conversation));

    let catalog_routes = Router::new()
        .route("/catalog/courses", get(handlers::list_courses))
        .route(
            "/catalog/courses/{code}/materials",
            get(handlers::course_materials),
        )
        .route(
            "/catalog/courses/{code}/past-questions",
            get(handlers::course_past_questions),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .merge(conversation_routes)
        .merge(catalog_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured port.
///
/// Binds to 127.0.0.1 (localhost only).
pub async fn start_server(config: &CampusConfig, state: AppState) -> Result<()> {
    let addr = format!("127.0.0.1:{}", config.general.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CampusError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| CampusError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
