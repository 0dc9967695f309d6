// handlers/protected/profiles/watchlist.rs - /profiles/:id/watchlist handlers

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Serialize;

use super::ProfileData;
use crate::api::ApiJson;
use crate::app::AppState;
use crate::auth::policy::Action;
use crate::database::models::WatchlistEntry;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::profiles::AddToWatchlistRequest;
use crate::services::ProfileService;

#[derive(Debug, Serialize)]
pub struct WatchlistData {
    pub watchlist: Vec<WatchlistEntry>,
}

/// GET /profiles/:id/watchlist
pub async fn watchlist_get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<WatchlistData> {
    let watchlist = ProfileService::new(&state).watchlist(&caller, &id).await?;
    Ok(ApiResponse::success(WatchlistData { watchlist }))
}

/// POST /profiles/:id/watchlist - `{ "movieId": "..." }`
pub async fn watchlist_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<ApiJson<AddToWatchlistRequest>, ApiError>,
) -> ApiResult<ProfileData> {
    let service = ProfileService::new(&state);
    let ApiJson(req) = match body {
        Ok(body) => body,
        Err(e) => {
            service.ensure_access(&caller, &id, Action::ManageWatchlist).await?;
            return Err(e);
        }
    };
    let profile = service.add_to_watchlist(&caller, &id, req).await?;
    Ok(ApiResponse::success(ProfileData { profile }))
}

/// DELETE /profiles/:id/watchlist/:movie_id
pub async fn watchlist_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((id, movie_id)): Path<(String, String)>,
) -> ApiResult<()> {
    ProfileService::new(&state)
        .remove_from_watchlist(&caller, &id, &movie_id)
        .await?;
    Ok(ApiResponse::no_content())
}
