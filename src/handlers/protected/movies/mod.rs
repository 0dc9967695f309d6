pub mod create;
pub mod delete;
pub mod update;

pub use create::movie_post;
pub use delete::movie_delete;
pub use update::movie_patch;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::Validator;
use crate::database::movies::{MovieChanges, NewMovie};
use crate::error::ApiError;

/// Body accepted by both create and partial update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl MovieRequest {
    pub fn into_new_movie(self) -> Result<NewMovie, ApiError> {
        Validator::new()
            .required(self.title.as_deref(), "title")
            .required(self.description.as_deref(), "description")
            .required(self.genre.as_deref(), "genre")
            .rating(self.rating)
            .finish()?;

        Ok(NewMovie {
            title: trimmed(self.title),
            description: trimmed(self.description),
            genre: trimmed(self.genre),
            rating: self.rating.unwrap_or(0.0),
            poster_url: self.poster_url.unwrap_or_default(),
            release_date: self.release_date,
        })
    }

    /// Fields that are present must be as valid as on create
    pub fn into_changes(self) -> Result<MovieChanges, ApiError> {
        let mut validator = Validator::new();
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("genre", &self.genre),
        ] {
            if value.is_some() {
                validator.required(value.as_deref(), field);
            }
        }
        validator.rating(self.rating).finish()?;

        Ok(MovieChanges {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            genre: self.genre.map(|g| g.trim().to_string()),
            rating: self.rating,
            poster_url: self.poster_url,
            release_date: self.release_date,
        })
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MovieRequest {
        MovieRequest {
            title: Some("  Heat ".into()),
            description: Some("Cops and robbers".into()),
            genre: Some("Action".into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_applies_defaults() {
        let movie = request().into_new_movie().unwrap();
        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.poster_url, "");
        assert!(movie.release_date.is_none());
    }

    #[test]
    fn create_requires_core_fields() {
        let err = MovieRequest::default().into_new_movie().unwrap_err();
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert!(fields.contains_key("title"));
                assert!(fields.contains_key("description"));
                assert!(fields.contains_key("genre"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn rating_must_stay_in_range() {
        let mut req = request();
        req.rating = Some(11.0);
        assert!(req.into_new_movie().is_err());

        let update = MovieRequest {
            rating: Some(-1.0),
            ..Default::default()
        };
        assert!(update.into_changes().is_err());
    }

    #[test]
    fn update_rejects_blank_present_fields_only() {
        let blank = MovieRequest {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert!(blank.into_changes().is_err());

        let partial = MovieRequest {
            rating: Some(8.0),
            ..Default::default()
        };
        let changes = partial.into_changes().unwrap();
        assert_eq!(changes.rating, Some(8.0));
        assert!(changes.title.is_none());
    }
}
