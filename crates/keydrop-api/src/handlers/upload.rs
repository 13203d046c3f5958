use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use keydrop_core::{AppError, ErrorMetadata, FileResponse};
use keydrop_services::UploadRequest;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// One file that was rejected during a batch upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadRejection {
    pub file_name: String,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub uploaded: Vec<FileResponse>,
    pub rejected: Vec<UploadRejection>,
}

#[utoipa::path(
    post,
    path = "/api/v0/files/{keyword}",
    tag = "files",
    params(
        ("keyword" = String, Path, description = "Keyword the files are stored under (3-50 chars, letters/digits/underscore/hyphen)")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "All files uploaded", body = UploadResponse),
        (status = 207, description = "Some files uploaded, some rejected", body = UploadResponse),
        (status = 400, description = "Invalid keyword, file name, or request body", body = ErrorResponse),
        (status = 409, description = "A live file with the same name already exists", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        // Fields without a filename (plain form values) are ignored.
        let Some(file_name) = field.file_name().map(String::from) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?
            .to_vec();

        files.push(UploadRequest {
            file_name,
            content_type,
            data,
        });
    }

    if files.is_empty() {
        return Err(AppError::InvalidInput("No files provided".to_string()).into());
    }

    let outcomes = state.lifecycle.upload_many(&keyword, files).await;

    let mut uploaded = Vec::new();
    let mut rejected = Vec::new();
    let mut first_error_status = None;
    for outcome in outcomes {
        match outcome.result {
            Ok(record) => uploaded.push(FileResponse::from(record)),
            Err(err) => {
                first_error_status.get_or_insert(err.http_status_code());
                rejected.push(UploadRejection {
                    file_name: outcome.file_name,
                    error: err.client_message(),
                    code: err.error_code().to_string(),
                });
            }
        }
    }

    let status = if rejected.is_empty() {
        StatusCode::CREATED
    } else if uploaded.is_empty() {
        // Everything failed: surface the first failure's status directly
        StatusCode::from_u16(first_error_status.unwrap_or(500))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    } else {
        StatusCode::MULTI_STATUS
    };

    Ok((status, Json(UploadResponse { uploaded, rejected })))
}
