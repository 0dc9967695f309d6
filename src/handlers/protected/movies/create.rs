// handlers/protected/movies/create.rs - POST /movies handler

use axum::{extract::State, Extension};

use super::MovieRequest;
use crate::api::ApiJson;
use crate::app::AppState;
use crate::auth::policy::{authorize, Action, Resource};
use crate::database::movies;
use crate::error::ApiError;
use crate::handlers::public::movies::MovieData;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/**
 * POST /movies - Add a movie to the catalog (account owners only)
 *
 * Expected Input:
 * ```json
 * {
 *   "title": "Heat",                 // Required
 *   "description": "...",            // Required
 *   "genre": "Action",               // Required
 *   "rating": 8.3,                   // Optional, 0-10, default 0
 *   "posterUrl": "https://...",      // Optional
 *   "releaseDate": "1995-12-15"      // Optional
 * }
 * ```
 */
pub async fn movie_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    body: Result<ApiJson<MovieRequest>, ApiError>,
) -> ApiResult<MovieData> {
    // Non-owners are refused before the body is looked at
    authorize(&caller, Resource::Catalog, Action::MutateCatalog).into_result()?;
    let ApiJson(req) = body?;

    let new_movie = req.into_new_movie()?;
    let movie = movies::insert(&state.pool, &new_movie).await?;
    tracing::info!("Movie {} created by {}", movie.id, caller.id);

    Ok(ApiResponse::created(MovieData { movie }))
}
