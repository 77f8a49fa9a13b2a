pub mod queries;
pub mod routes;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use axum::{http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::db::StoreError;

pub const TOKEN_TTL_HOURS: i64 = 24;
pub const MIN_PASSWORD_LEN: usize = 8;

// MODELS

#[derive(Deserialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid payload")]
    InvalidPayload,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("invalid token")]
    InvalidToken,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => AuthError::EmailTaken,
            other => AuthError::Store(other),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AuthError::InvalidPayload => (StatusCode::BAD_REQUEST, "invalid payload"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::EmailTaken => (StatusCode::CONFLICT, "email already registered"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
            AuthError::Hash(_) | AuthError::Token(_) | AuthError::Store(_) => {
                tracing::error!(error = %self, "auth request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "could not complete request")
            }
        };
        (status, message).into_response()
    }
}

// HELPER FUNCTIONS

/// Signing material for session tokens, built once from config.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Returns the user id carried in a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| {
                tracing::debug!(error = %e, "JWT decode error");
                AuthError::InvalidToken
            })?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| AuthError::InvalidToken)
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trips_user_id() {
        let keys = JwtKeys::from_secret("test-secret");
        let user_id = Uuid::new_v4();

        let token = keys.issue(user_id).unwrap();

        assert_eq!(keys.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = JwtKeys::from_secret("one").issue(Uuid::new_v4()).unwrap();

        let err = JwtKeys::from_secret("two").verify(&token).unwrap_err();

        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();

        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_conflict_maps_to_email_taken() {
        assert!(matches!(AuthError::from(StoreError::Conflict), AuthError::EmailTaken));
    }
}
