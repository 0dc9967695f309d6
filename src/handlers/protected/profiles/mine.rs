// handlers/protected/profiles/mine.rs - GET /profiles/getmyprofiles handler

use axum::{extract::State, Extension};

use super::ProfilesData;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProfileService;

pub async fn my_profiles_get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<ProfilesData> {
    let profiles = ProfileService::new(&state).mine(&caller).await?;
    Ok(ApiResponse::success(ProfilesData { profiles }))
}
