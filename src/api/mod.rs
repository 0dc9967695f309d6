pub mod json;
pub mod validate;

pub use json::ApiJson;
pub use validate::Validator;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id; anything that is not a UUID cannot name an existing record
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} not found", entity)))
}
