pub mod create_profile;

pub use create_profile::create_profile_post;
