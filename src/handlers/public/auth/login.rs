// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;

use crate::api::ApiJson;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::accounts::{LoginRequest, UserData};
use crate::services::AccountService;

/// POST /auth/login - Exchange email and password for a bearer token
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<UserData> {
    let authenticated = AccountService::new(&state).login(req).await?;
    Ok(ApiResponse::success(authenticated.data).with_token(authenticated.token))
}
