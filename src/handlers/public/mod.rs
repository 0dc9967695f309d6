// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account registration, login and read-only catalog access.

pub mod auth;
pub mod movies;
