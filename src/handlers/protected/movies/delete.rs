// handlers/protected/movies/delete.rs - DELETE /movies/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::api::parse_id;
use crate::app::AppState;
use crate::auth::policy::{authorize, Action, Resource};
use crate::database::movies;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// DELETE /movies/:id - Remove a movie; watchlist entries go with it
pub async fn movie_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    authorize(&caller, Resource::Catalog, Action::MutateCatalog).into_result()?;

    let id = parse_id(&id, "Movie")?;
    if !movies::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Movie not found"));
    }
    tracing::info!("Movie {} deleted by {}", id, caller.id);

    Ok(ApiResponse::no_content())
}
