use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

/// JWT claims payload, shared by access and refresh tokens. The two
/// families are told apart by signing secret, not by shape.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role name at issuance time
    pub role: String,
    /// Student identification number
    pub nim: String,
    /// Unique token id. Two tokens signed in the same second would
    /// otherwise be byte-identical, which breaks rotation checks.
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

fn sign(
    user_id: &str,
    role: &str,
    nim: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let expires = now + ttl;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        nim: nim.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp() as usize,
        exp: expires.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to create token: {}", e)))
}

fn verify(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Sign an access token.
pub fn sign_access_token(
    user_id: &str,
    role: &str,
    nim: &str,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, ApiError> {
    sign(user_id, role, nim, secret, Duration::hours(expiry_hours as i64))
}

/// Sign a refresh token.
pub fn sign_refresh_token(
    user_id: &str,
    role: &str,
    nim: &str,
    secret: &str,
    expiry_days: u64,
) -> Result<String, ApiError> {
    sign(user_id, role, nim, secret, Duration::days(expiry_days as i64))
}

/// Validate an access token and return its claims.
///
/// All failure modes (bad signature, expired, malformed) collapse into a
/// single error so callers cannot distinguish them.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    verify(token, secret).ok_or_else(|| ApiError::Unauthorized("Invalid access token".to_string()))
}

/// Validate a refresh token and return its claims.
///
/// Same collapse-all-failures policy as [`verify_access_token`].
pub fn verify_refresh_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    verify(token, secret).ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))
}
