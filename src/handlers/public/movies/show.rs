// handlers/public/movies/show.rs - GET /movies/:id handler

use axum::extract::{Path, State};

use super::MovieData;
use crate::api::parse_id;
use crate::app::AppState;
use crate::database::movies;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /movies/:id - Show one movie
pub async fn movie_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<MovieData> {
    let id = parse_id(&id, "Movie")?;
    let movie = movies::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Movie not found"))?;

    Ok(ApiResponse::success(MovieData { movie }))
}
