// Authentication Primitives
//
// Stateless HS256 bearer tokens plus bcrypt password hashing. Tokens carry
// only the user id; role and account existence are re-checked per request by
// the auth middleware.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::error::ApiError;

pub const TOKEN_ISSUER: &str = "prompti-api";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued for.
    pub sub: String,
    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,
    /// Token issuer.
    pub iss: String,
}

pub fn generate_token(user_id: &str, security: &SecurityConfig) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::days(security.token_expiry_days)).timestamp(),
        iat: now.timestamp(),
        iss: TOKEN_ISSUER.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(security.token_secret.as_bytes()),
    )
    .map_err(|err| {
        tracing::error!("Token generation failed: {}", err);
        ApiError::internal_server_error("Could not issue token")
    })
}

/// Decode and verify a bearer token. Any failure (bad signature, expired,
/// malformed, wrong issuer) collapses to the same 401 so callers learn
/// nothing about which check failed.
pub fn validate_token(token: &str, security: &SecurityConfig) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[TOKEN_ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(security.token_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|err| {
        tracing::error!("Password hashing failed: {}", err);
        ApiError::internal_server_error("Could not process credentials")
    })
}

/// Constant-shape verification: a malformed stored hash verifies as false
/// rather than erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Minimal structural email check: one '@', non-empty local part, and a
/// dotted domain.
pub fn validate_email_format(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
