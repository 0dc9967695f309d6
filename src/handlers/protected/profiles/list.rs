// handlers/protected/profiles/list.rs - GET /profiles handler

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Extension,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProfileService;

/// GET /profiles - The caller's account profiles, with the same query options as /movies
pub async fn profiles_get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let page = ProfileService::new(&state).list_owned(&caller, &params).await?;
    Ok(ApiResponse::success(json!({ "profiles": page.rows })).with_pagination(&page))
}
