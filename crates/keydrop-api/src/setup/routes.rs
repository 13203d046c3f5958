//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use keydrop_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Slack on top of the file size cap for multipart framing overhead.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/openapi.json", get(openapi_spec))
        .route(
            "/api/v0/files/{keyword}",
            post(handlers::upload::upload_files)
                .get(handlers::list::list_files)
                .delete(handlers::delete::delete_all),
        )
        .route(
            "/api/v0/files/{keyword}/archive",
            get(handlers::download::download_archive),
        )
        .route(
            "/api/v0/files/{keyword}/{file_name}",
            axum::routing::delete(handlers::delete::delete_file),
        )
        .route(
            "/api/v0/files/{keyword}/{file_name}/download",
            get(handlers::download::download_file),
        )
        .route(
            "/api/v0/files/{keyword}/{file_name}/download-url",
            get(handlers::download::download_url),
        )
        .route(
            "/api/v0/maintenance/cleanup",
            post(handlers::maintenance::run_cleanup),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };

    Ok(cors)
}
