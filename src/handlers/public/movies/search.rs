// handlers/public/movies/search.rs - GET /movies/search handler

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::movies::MOVIES;
use crate::database::QueryBuilder;
use crate::filter::{Filter, FilterError, FilterOp, FilterOptions};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub title: Option<String>,
    /// Comma separated; a movie matches any of them
    pub genres: Option<String>,
    pub release_year: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchQuery {
    pub fn into_filter(self, options: FilterOptions) -> Result<Filter, FilterError> {
        let mut filter = Filter::new(&MOVIES, options);

        if let Some(title) = &self.title {
            filter.contains("title", title)?;
        }

        if let Some(genres) = &self.genres {
            let list: Vec<&str> = genres.split(',').map(str::trim).filter(|g| !g.is_empty()).collect();
            if !list.is_empty() {
                filter.where_in("genre", &list)?;
            }
        }

        if let Some(raw) = &self.release_year {
            let year = raw
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|y| (1..=9998).contains(y))
                .ok_or_else(|| FilterError::InvalidValue {
                    field: "releaseYear".to_string(),
                    value: raw.clone(),
                })?;
            filter
                .where_field("releaseDate", FilterOp::Gte, &format!("{:04}-01-01", year))?
                .where_field("releaseDate", FilterOp::Lt, &format!("{:04}-01-01", year + 1))?;
        }

        if let Some(min) = &self.min_rating {
            filter.where_field("rating", FilterOp::Gte, min)?;
        }
        if let Some(max) = &self.max_rating {
            filter.where_field("rating", FilterOp::Lte, max)?;
        }
        if let Some(sort) = &self.sort_by {
            filter.sort(sort)?;
        }

        filter.paginate(self.page.as_deref(), self.limit.as_deref());
        Ok(filter)
    }
}

/// GET /movies/search - Advanced search by title, genres, release year and rating range
pub async fn movies_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Value> {
    let filter = query.into_filter(FilterOptions::from(&state.config.filter))?;
    let page = QueryBuilder::new(filter).list(&state.pool).await?;

    Ok(ApiResponse::success(json!({ "movies": page.rows })).with_pagination(&page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterValue;
    use chrono::NaiveDate;

    #[test]
    fn builds_combined_search() {
        let query = SearchQuery {
            title: Some("ring".into()),
            genres: Some("Fantasy, Adventure,".into()),
            release_year: Some("2001".into()),
            min_rating: Some("7".into()),
            sort_by: Some("-rating".into()),
            limit: Some("5".into()),
            ..Default::default()
        };
        let filter = query.into_filter(FilterOptions::default()).unwrap();
        let sql = filter.to_sql();

        assert!(sql.query.contains(
            "WHERE (\"title\" ILIKE $1) AND \"genre\" IN ($2, $3) \
             AND \"release_date\" >= $4 AND \"release_date\" < $5 AND \"rating\" >= $6"
        ));
        assert!(sql.query.contains("ORDER BY \"rating\" DESC, \"id\" ASC"));
        assert_eq!(filter.limit(), 5);
        assert_eq!(
            sql.params[3],
            FilterValue::Date(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap())
        );
        assert_eq!(
            sql.params[4],
            FilterValue::Date(NaiveDate::from_ymd_opt(2002, 1, 1).unwrap())
        );
    }

    #[test]
    fn empty_search_is_default_listing() {
        let filter = SearchQuery::default().into_filter(FilterOptions::default()).unwrap();
        assert!(!filter.to_sql().query.contains("WHERE"));
        assert_eq!(filter.limit(), 10);
    }

    #[test]
    fn rejects_bad_year_and_rating() {
        let bad_year = SearchQuery {
            release_year: Some("nineteen".into()),
            ..Default::default()
        };
        assert!(bad_year.into_filter(FilterOptions::default()).is_err());

        let bad_rating = SearchQuery {
            max_rating: Some("ten".into()),
            ..Default::default()
        };
        assert!(bad_rating.into_filter(FilterOptions::default()).is_err());
    }
}
