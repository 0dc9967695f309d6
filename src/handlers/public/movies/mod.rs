pub mod list;
pub mod search;
pub mod show;

pub use list::movies_get;
pub use search::movies_search;
pub use show::movie_get;

use serde::Serialize;

use crate::database::models::Movie;

#[derive(Debug, Serialize)]
pub struct MovieData {
    pub movie: Movie,
}
