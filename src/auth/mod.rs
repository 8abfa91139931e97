use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::database::models::user::{User, UserStatus};

pub mod password;
pub mod roles;

pub use roles::Role;

/// Claims embedded in the bearer token issued at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub role: Role,
    pub username: String,
    pub email: String,
    pub last_login: DateTime<Utc>,
    pub status: UserStatus,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Build claims for an authenticated account. `last_login` is passed
    /// separately because the login flow stamps it during identification.
    pub fn for_user(user: &User, last_login: DateTime<Utc>) -> Self {
        let now = Utc::now();
        let expiry_days = config::config().security.jwt_expiry_days;
        let exp = (now + Duration::days(expiry_days)).timestamp();

        Self {
            user_id: user.id,
            role: user.role,
            username: user.username.clone(),
            email: user.email.clone(),
            last_login,
            status: user.status,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Token lifetime in seconds, as reported to clients in `expiresIn`.
pub fn token_expiry_secs() -> i64 {
    config::config().security.jwt_expiry_days * 24 * 60 * 60
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("JWT validation error: {0}")]
    TokenValidation(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn decode_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::TokenValidation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Admin,
            status: UserStatus::Active,
            password_hash: "$2b$12$x".to_string(),
            last_login: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let user = sample_user();
        let stamped = Utc::now();
        let claims = Claims::for_user(&user, stamped);
        let token = generate_jwt(&claims).unwrap();

        let decoded = decode_jwt(&token).unwrap();
        assert_eq!(decoded.user_id, user.id);
        assert_eq!(decoded.role, Role::Admin);
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.email, "alice@example.com");
        assert_eq!(decoded.status, UserStatus::Active);
        assert_eq!(decoded.last_login.timestamp(), stamped.timestamp());
    }

    #[test]
    fn expiry_matches_configured_days() {
        let user = sample_user();
        let claims = Claims::for_user(&user, Utc::now());
        let days = config::config().security.jwt_expiry_days;
        let expected = claims.iat + days * 24 * 60 * 60;
        assert_eq!(claims.exp, expected);
        assert_eq!(token_expiry_secs(), days * 24 * 60 * 60);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let user = sample_user();
        let claims = Claims::for_user(&user, Utc::now());
        let mut token = generate_jwt(&claims).unwrap();
        token.push('x');
        assert!(decode_jwt(&token).is_err());
    }
}
