pub mod movie;
pub mod profile;
pub mod role;
pub mod user;

pub use movie::Movie;
pub use profile::{Profile, WatchlistEntry};
pub use role::Role;
pub use user::User;
