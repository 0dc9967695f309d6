// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here receives the verified caller as `Extension<AuthUser>`
// and checks permissions through `auth::policy::authorize`.

pub mod auth;
pub mod movies;
pub mod profiles;
