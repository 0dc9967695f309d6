// handlers/protected/auth/create_profile.rs - POST /auth/create-profile handler

use axum::{extract::State, Extension};

use crate::api::ApiJson;
use crate::app::AppState;
use crate::auth::policy::{authorize, Action, Resource};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::accounts::{CreateProfileRequest, UserProfileData};
use crate::services::AccountService;

/**
 * POST /auth/create-profile - Add a profile (and its login) to the caller's account
 *
 * Account owners only. Expected Input:
 * ```json
 * {
 *   "username": "kid",
 *   "email": "kid@x.com",
 *   "password": "secret1",
 *   "type": "child_profile",   // standard_profile | child_profile
 *   "name": "Kid",             // Optional, defaults to username
 *   "avatar": "kid.png"        // Optional
 * }
 * ```
 *
 * The returned token belongs to the new user, not the caller.
 */
pub async fn create_profile_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    body: Result<ApiJson<CreateProfileRequest>, ApiError>,
) -> ApiResult<UserProfileData> {
    authorize(&caller, Resource::Account, Action::CreateProfile).into_result()?;
    let ApiJson(req) = body?;

    let authenticated = AccountService::new(&state).create_profile(&caller, req).await?;
    Ok(ApiResponse::created(authenticated.data).with_token(authenticated.token))
}
