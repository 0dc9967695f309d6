pub mod delete;
pub mod list;
pub mod mine;
pub mod show;
pub mod update;
pub mod watchlist;

pub use delete::profile_delete;
pub use list::profiles_get;
pub use mine::my_profiles_get;
pub use show::profile_get;
pub use update::profile_patch;
pub use watchlist::{watchlist_delete, watchlist_get, watchlist_post};

use serde::Serialize;

use crate::database::models::Profile;

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct ProfilesData {
    pub profiles: Vec<Profile>,
}
