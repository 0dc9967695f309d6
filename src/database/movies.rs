use chrono::NaiveDate;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Movie;
use crate::filter::{Collection, Column, ColumnKind, SortDirection};

pub static MOVIES: Collection = Collection {
    table: "movies",
    columns: &[
        Column::new("id", "id", ColumnKind::Uuid),
        Column::new("title", "title", ColumnKind::Text),
        Column::new("description", "description", ColumnKind::Text),
        Column::new("genre", "genre", ColumnKind::Text),
        Column::new("rating", "rating", ColumnKind::Number),
        Column::new("posterUrl", "poster_url", ColumnKind::Text),
        Column::new("releaseDate", "release_date", ColumnKind::Date),
        Column::new("createdAt", "created_at", ColumnKind::Timestamp),
        Column::new("updatedAt", "updated_at", ColumnKind::Timestamp),
    ],
    search_fields: &["title", "description", "genre"],
    default_sort: &[("createdAt", SortDirection::Desc)],
};

const SELECT_MOVIE: &str = "SELECT id, title, description, genre, rating, poster_url, release_date, \
     created_at, updated_at FROM movies";

const RETURNING_MOVIE: &str =
    "RETURNING id, title, description, genre, rating, poster_url, release_date, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub rating: f64,
    pub poster_url: String,
    pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Movie>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let movie = sqlx::query_as::<_, Movie>(&format!("{} WHERE id = $1", SELECT_MOVIE))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(movie)
}

pub async fn insert<'e, E>(executor: E, new_movie: &NewMovie) -> Result<Movie, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO movies (id, title, description, genre, rating, poster_url, release_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) {}",
        RETURNING_MOVIE
    );

    let movie = sqlx::query_as::<_, Movie>(&sql)
        .bind(Uuid::new_v4())
        .bind(&new_movie.title)
        .bind(&new_movie.description)
        .bind(&new_movie.genre)
        .bind(new_movie.rating)
        .bind(&new_movie.poster_url)
        .bind(new_movie.release_date)
        .fetch_one(executor)
        .await?;
    Ok(movie)
}

pub async fn update<'e, E>(executor: E, id: Uuid, changes: &MovieChanges) -> Result<Option<Movie>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "UPDATE movies SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             genre = COALESCE($4, genre), \
             rating = COALESCE($5, rating), \
             poster_url = COALESCE($6, poster_url), \
             release_date = COALESCE($7, release_date), \
             updated_at = now() \
         WHERE id = $1 {}",
        RETURNING_MOVIE
    );

    let movie = sqlx::query_as::<_, Movie>(&sql)
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.genre.as_deref())
        .bind(changes.rating)
        .bind(changes.poster_url.as_deref())
        .bind(changes.release_date)
        .fetch_optional(executor)
        .await?;
    Ok(movie)
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM movies WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
