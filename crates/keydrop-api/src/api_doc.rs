//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use keydrop_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Keydrop API",
        version = "0.1.0",
        description = "Keyword-addressed, time-limited file sharing. Files are uploaded under a human-chosen keyword, live for 24 hours, and are served through short-lived download URLs. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::upload::upload_files,
        handlers::list::list_files,
        handlers::download::download_url,
        handlers::download::download_file,
        handlers::download::download_archive,
        handlers::delete::delete_file,
        handlers::delete::delete_all,
        handlers::maintenance::run_cleanup,
        handlers::health::health,
    ),
    components(
        schemas(
            models::FileResponse,
            handlers::upload::UploadResponse,
            handlers::upload::UploadRejection,
            handlers::download::DownloadUrlResponse,
            handlers::delete::DeleteAllResponse,
            handlers::maintenance::CleanupResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "files", description = "Upload, listing, download, and deletion of keyword-addressed files"),
        (name = "maintenance", description = "Health checks and expiry sweeps")
    )
)]
pub struct ApiDoc;
