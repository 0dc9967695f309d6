pub mod password;
pub mod policy;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::types::RoleName;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub role: RoleName,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: Uuid, role: RoleName, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            id,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

pub fn generate_jwt(security: &SecurityConfig, claims: &Claims) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Issue a token for a user with the configured lifetime
pub fn issue_token(security: &SecurityConfig, user_id: Uuid, role: RoleName) -> Result<String, JwtError> {
    generate_jwt(security, &Claims::new(user_id, role, security.jwt_expiry_hours))
}

pub fn validate_jwt(security: &SecurityConfig, token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security(secret: &str) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: secret.to_string(),
            jwt_expiry_hours: 24,
            cors_origins: vec![],
        }
    }

    #[test]
    fn issued_tokens_round_trip() {
        let config = security("test-secret");
        let user_id = Uuid::new_v4();

        let token = issue_token(&config, user_id, RoleName::AccountOwner).unwrap();
        let claims = validate_jwt(&config, &token).unwrap();

        assert_eq!(claims.id, user_id);
        assert_eq!(claims.role, RoleName::AccountOwner);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let token = issue_token(&security("one"), Uuid::new_v4(), RoleName::ChildProfile).unwrap();
        let err = validate_jwt(&security("two"), &token).unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn rejects_expired_tokens() {
        let config = security("test-secret");
        let mut claims = Claims::new(Uuid::new_v4(), RoleName::StandardProfile, 1);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;

        let token = generate_jwt(&config, &claims).unwrap();
        assert!(matches!(validate_jwt(&config, &token), Err(JwtError::Expired)));
    }

    #[test]
    fn rejects_garbage() {
        let err = validate_jwt(&security("s"), "not.a.jwt").unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }
}
