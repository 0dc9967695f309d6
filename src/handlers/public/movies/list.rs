// handlers/public/movies/list.rs - GET /movies handler

use std::collections::HashMap;

use axum::extract::{Query, State};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::movies::MOVIES;
use crate::database::QueryBuilder;
use crate::filter::{Filter, FilterOptions};
use crate::middleware::{ApiResponse, ApiResult};

/**
 * GET /movies - Filtered, searched, sorted and paginated catalog listing
 *
 * Query parameters:
 * - `field=value` / `field[gte|gt|lte|lt]=value` on any movie field
 * - `q` free-text search over title, description and genre
 * - `sort=-rating,title`, `fields=title,rating` or `fields=-description`
 * - `page` (default 1), `limit` (default 10, capped)
 */
pub async fn movies_get(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let filter = Filter::from_query(&MOVIES, &params, FilterOptions::from(&state.config.filter))?;
    let page = QueryBuilder::new(filter).list(&state.pool).await?;

    Ok(ApiResponse::success(json!({ "movies": page.rows })).with_pagination(&page))
}
