use std::str::FromStr;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::auth::jwt;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::role::Role;

/// Extractor that validates the bearer access token and exposes the
/// authenticated caller.
///
/// Usage in handlers:
/// ```rust,ignore
/// async fn my_handler(auth: AuthUser) -> impl IntoResponse {
///     // auth.user_id, auth.role, auth.nim
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
    pub nim: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Allow only callers whose role is in the given set.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Forbidden".to_string()))
        }
    }

    /// Allow only admins.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Forbidden: Admin only".to_string()))
        }
    }

    /// Allow the resource owner or an admin.
    pub fn require_owner_or_admin(&self, owner_id: Uuid) -> Result<(), ApiError> {
        if self.user_id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Forbidden: You are not authorized to modify this resource".to_string(),
            ))
        }
    }

    /// Allow the subject user themselves or an admin.
    pub fn require_self_or_admin(&self, subject_id: Uuid) -> Result<(), ApiError> {
        if self.user_id == subject_id || self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Forbidden: You can only manage your own account".to_string(),
            ))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        // Expect "Bearer <token>"
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        // Arc<Config> lives in request extensions (cheap Arc clone per request)
        let config = parts
            .extensions
            .get::<Arc<Config>>()
            .ok_or_else(|| ApiError::Internal("Config not found in request".to_string()))?;

        let claims = jwt::verify_access_token(token, &config.access_token_secret)?;

        let invalid = || ApiError::Unauthorized("Invalid access token".to_string());
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| invalid())?;
        let role = Role::from_str(&claims.role).map_err(|_| invalid())?;

        Ok(AuthUser {
            user_id,
            role,
            nim: claims.nim,
        })
    }
}
