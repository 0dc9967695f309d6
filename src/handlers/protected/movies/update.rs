// handlers/protected/movies/update.rs - PATCH /movies/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use super::MovieRequest;
use crate::api::{parse_id, ApiJson};
use crate::app::AppState;
use crate::auth::policy::{authorize, Action, Resource};
use crate::database::movies;
use crate::error::ApiError;
use crate::handlers::public::movies::MovieData;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// PATCH /movies/:id - Partial update; absent fields keep their value
pub async fn movie_patch(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<ApiJson<MovieRequest>, ApiError>,
) -> ApiResult<MovieData> {
    authorize(&caller, Resource::Catalog, Action::MutateCatalog).into_result()?;
    let ApiJson(req) = body?;

    let id = parse_id(&id, "Movie")?;
    let changes = req.into_changes()?;
    let movie = movies::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Movie not found"))?;

    Ok(ApiResponse::success(MovieData { movie }))
}
