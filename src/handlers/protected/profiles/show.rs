// handlers/protected/profiles/show.rs - GET /profiles/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use super::ProfileData;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProfileService;

pub async fn profile_get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ProfileData> {
    let profile = ProfileService::new(&state).get(&caller, &id).await?;
    Ok(ApiResponse::success(ProfileData { profile }))
}
