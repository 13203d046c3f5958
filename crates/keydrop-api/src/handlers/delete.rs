use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteAllResponse {
    /// Number of file records removed (live and expired)
    pub deleted_count: u64,
}

#[utoipa::path(
    delete,
    path = "/api/v0/files/{keyword}/{file_name}",
    tag = "files",
    params(
        ("keyword" = String, Path, description = "Keyword the file is stored under"),
        ("file_name" = String, Path, description = "File name to delete")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, description = "File not found or expired", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path((keyword, file_name)): Path<(String, String)>,
) -> Result<StatusCode, HttpAppError> {
    state.lifecycle.delete_one(&keyword, &file_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/v0/files/{keyword}",
    tag = "files",
    params(
        ("keyword" = String, Path, description = "Keyword to delete all files for")
    ),
    responses(
        (status = 200, description = "All files under the keyword deleted (count may be zero)", body = DeleteAllResponse),
        (status = 400, description = "Invalid keyword", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_all(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> Result<Json<DeleteAllResponse>, HttpAppError> {
    let deleted_count = state.lifecycle.delete_all(&keyword).await?;
    Ok(Json(DeleteAllResponse { deleted_count }))
}
