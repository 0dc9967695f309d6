// handlers/protected/profiles/update.rs - PATCH /profiles/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use super::ProfileData;
use crate::api::ApiJson;
use crate::app::AppState;
use crate::auth::policy::Action;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::profiles::UpdateProfileRequest;
use crate::services::ProfileService;

/**
 * PATCH /profiles/:id - Update a profile and its paired user
 *
 * Expected Input (all optional):
 * ```json
 * {
 *   "name": "Weekend",
 *   "avatar": "w.png",
 *   "email": "w@x.com",        // written to the profile and the user
 *   "username": "weekend",
 *   "password": "secret2",
 *   "role": "child_profile"    // account owners only
 * }
 * ```
 */
pub async fn profile_patch(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<ApiJson<UpdateProfileRequest>, ApiError>,
) -> ApiResult<ProfileData> {
    let service = ProfileService::new(&state);
    let ApiJson(req) = match body {
        Ok(body) => body,
        Err(e) => {
            service.ensure_access(&caller, &id, Action::UpdateProfile).await?;
            return Err(e);
        }
    };
    let profile = service.update(&caller, &id, req).await?;
    Ok(ApiResponse::success(ProfileData { profile }))
}
