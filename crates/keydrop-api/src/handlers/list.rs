use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use keydrop_core::{AppError, FileResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/files/{keyword}",
    tag = "files",
    params(
        ("keyword" = String, Path, description = "Keyword to list files for")
    ),
    responses(
        (status = 200, description = "Live files under the keyword, newest first", body = [FileResponse]),
        (status = 400, description = "Invalid keyword", body = ErrorResponse),
        (status = 404, description = "No live files under the keyword", body = ErrorResponse)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<FileResponse>>, HttpAppError> {
    let records = state.lifecycle.list_by_keyword(&keyword).await?;

    // A keyword with no live files is indistinguishable from one that was
    // never used; both read as 404.
    if records.is_empty() {
        return Err(AppError::NotFound(format!(
            "No files found under keyword '{}'",
            keyword.trim().to_lowercase()
        ))
        .into());
    }

    Ok(Json(records.into_iter().map(FileResponse::from).collect()))
}
