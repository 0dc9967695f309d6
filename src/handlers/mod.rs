// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token verified by `middleware::auth`)

pub mod protected;
pub mod public;
