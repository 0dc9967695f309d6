// handlers/protected/profiles/delete.rs - DELETE /profiles/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProfileService;

/// DELETE /profiles/:id - Delete a sub-profile together with its user
pub async fn profile_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    ProfileService::new(&state).delete(&caller, &id).await?;
    Ok(ApiResponse::no_content())
}
