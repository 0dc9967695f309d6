pub mod manager;
pub mod models;
pub mod movies;
pub mod profiles;
pub mod query_builder;
pub mod roles;
pub mod users;

pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::{ListPage, QueryBuilder};
