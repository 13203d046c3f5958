use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use keydrop_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadUrlResponse {
    /// Short-lived URL granting read access to the file
    pub url: String,
    pub expires_in_seconds: u64,
}

#[utoipa::path(
    get,
    path = "/api/v0/files/{keyword}/{file_name}/download-url",
    tag = "files",
    params(
        ("keyword" = String, Path, description = "Keyword the file is stored under"),
        ("file_name" = String, Path, description = "File name")
    ),
    responses(
        (status = 200, description = "Time-limited download URL", body = DownloadUrlResponse),
        (status = 404, description = "File not found or expired", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn download_url(
    State(state): State<Arc<AppState>>,
    Path((keyword, file_name)): Path<(String, String)>,
) -> Result<Json<DownloadUrlResponse>, HttpAppError> {
    let url = state.lifecycle.download_url(&keyword, &file_name).await?;

    Ok(Json(DownloadUrlResponse {
        url,
        expires_in_seconds: state.config.download_url_ttl().as_secs(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v0/files/{keyword}/{file_name}/download",
    tag = "files",
    params(
        ("keyword" = String, Path, description = "Keyword the file is stored under"),
        ("file_name" = String, Path, description = "File name")
    ),
    responses(
        (status = 307, description = "Redirect to a time-limited download URL"),
        (status = 404, description = "File not found or expired", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path((keyword, file_name)): Path<(String, String)>,
) -> Result<Redirect, HttpAppError> {
    let url = state.lifecycle.download_url(&keyword, &file_name).await?;
    Ok(Redirect::temporary(&url))
}

#[utoipa::path(
    get,
    path = "/api/v0/files/{keyword}/archive",
    tag = "files",
    params(
        ("keyword" = String, Path, description = "Keyword to archive all live files for")
    ),
    responses(
        (status = 200, description = "ZIP archive of all live files", content_type = "application/zip"),
        (status = 404, description = "No live files under the keyword", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_archive"))]
pub async fn download_archive(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let archive = state.lifecycle.download_all_archive(&keyword).await?;

    // Keywords are restricted to [a-z0-9_-], safe in a quoted filename
    let content_disposition = format!(
        "attachment; filename=\"{}.zip\"",
        keyword.trim().to_lowercase()
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .body(Body::from(archive))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
