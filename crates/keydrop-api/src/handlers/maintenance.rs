use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResponse {
    /// Number of expired files removed by this sweep
    pub deleted_count: u64,
}

/// Manual trigger for the expiry sweep. The same sweep also runs on the
/// background schedule; running both concurrently is safe.
#[utoipa::path(
    post,
    path = "/api/v0/maintenance/cleanup",
    tag = "maintenance",
    responses(
        (status = 200, description = "Sweep completed", body = CleanupResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn run_cleanup(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CleanupResponse>, HttpAppError> {
    let deleted_count = state.lifecycle.expire_sweep().await?;
    Ok(Json(CleanupResponse { deleted_count }))
}
