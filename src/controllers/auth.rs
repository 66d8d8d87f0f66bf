use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::service::{self, RegisterData};
use crate::error::ApiError;
use crate::extractors::Json;
use crate::models::user::{UserProfileResponse, UserResponse};
use crate::response::ApiResponse;

use super::AppState;

// ── Request / Response types ──

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 5, message = "NIM must be at least 5 characters"))]
    pub nim: String,

    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub password: String,

    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub phone_number: String,

    pub enrollment_year: i32,
    pub graduation_year: i32,

    pub province_id: uuid::Uuid,
    pub city_id: uuid::Uuid,
    pub faculty_id: uuid::Uuid,
    pub major_id: uuid::Uuid,

    #[validate(length(min = 1, message = "Verification file is required"))]
    pub verification_file_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub nim: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub old_refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MeRequest {
    pub access_token: String,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me).post(me_from_body))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))
}

// ── Handlers ──

/// Register a new alumni account.
///
/// The public endpoint never forwards a role; new accounts always get
/// the default role.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "NIM, email or phone already registered")
    ),
    tag = "auth"
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let user = service::register(
        &state.db,
        &state.config,
        RegisterData {
            nim: payload.nim,
            name: payload.name,
            email: payload.email,
            password: payload.password,
            phone_number: payload.phone_number,
            enrollment_year: payload.enrollment_year,
            graduation_year: payload.graduation_year,
            role_id: None,
            province_id: payload.province_id,
            city_id: payload.city_id,
            faculty_id: payload.faculty_id,
            major_id: payload.major_id,
            verification_file_url: payload.verification_file_url,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        axum::Json(ApiResponse::success(UserResponse::from(user))),
    ))
}

/// Authenticate with NIM and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid NIM or password")
    ),
    tag = "auth"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    let (user, tokens) = service::login(&state.db, &state.config, &payload.nim, &payload.password).await?;

    Ok(ApiResponse::success(AuthResponse {
        user: UserResponse::from(user),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Rotate a refresh token for a new access/refresh pair.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = ApiResponse<TokenPairResponse>),
        (status = 401, description = "Invalid refresh token")
    ),
    tag = "auth"
)]
pub(crate) async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<ApiResponse<TokenPairResponse>, ApiError> {
    let tokens = service::refresh(&state.db, &state.config, &payload.old_refresh_token).await?;

    Ok(ApiResponse::success(TokenPairResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Fetch the caller's profile from the bearer access token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserProfileResponse>),
        (status = 401, description = "Invalid access token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub(crate) async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<UserProfileResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    let profile = service::me(&state.db, &state.config, token).await?;
    Ok(ApiResponse::success(profile))
}

/// Same as `me`, but taking the token in the body for clients that
/// cannot set headers.
#[utoipa::path(
    post,
    path = "/api/auth/me",
    request_body = MeRequest,
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserProfileResponse>),
        (status = 401, description = "Invalid access token"),
        (status = 404, description = "User not found")
    ),
    tag = "auth"
)]
pub(crate) async fn me_from_body(
    State(state): State<AppState>,
    Json(payload): Json<MeRequest>,
) -> Result<ApiResponse<UserProfileResponse>, ApiError> {
    let profile = service::me(&state.db, &state.config, &payload.access_token).await?;
    Ok(ApiResponse::success(profile))
}
