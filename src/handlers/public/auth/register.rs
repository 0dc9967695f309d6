// handlers/public/auth/register.rs - POST /auth/register handler

use axum::extract::State;

use crate::api::ApiJson;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::accounts::{RegisterRequest, UserData};
use crate::services::AccountService;

/**
 * POST /auth/register - Create an account owner and its primary profile
 *
 * Expected Input:
 * ```json
 * { "username": "ana", "email": "ana@x.com", "password": "secret1" }
 * ```
 *
 * Responds 201 with `token` and `data.user` (never the password hash).
 */
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<UserData> {
    let authenticated = AccountService::new(&state).register(req).await?;
    Ok(ApiResponse::created(authenticated.data).with_token(authenticated.token))
}
