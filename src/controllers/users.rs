use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password;
use crate::auth::service::{self, RegisterData};
use crate::error::ApiError;
use crate::extractors::{AuthUser, Json, ListQuery, PageMeta};
use crate::models::role::Role;
use crate::models::user::{self, Entity as User, UserProfileResponse, UserResponse};
use crate::response::ApiResponse;

use super::AppState;

// ── Request / Response types ──

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
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

    /// Unlike public registration, admins may assign an explicit role.
    pub role_id: Option<Uuid>,

    pub province_id: Uuid,
    pub city_id: Uuid,
    pub faculty_id: Uuid,
    pub major_id: Uuid,

    #[validate(length(min = 1, message = "Verification file is required"))]
    pub verification_file_url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub phone_number: Option<String>,

    pub graduation_year: Option<i32>,

    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

// ── Handlers ──

/// List users. Any authenticated member.
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListQuery),
    responses(
        (status = 200, description = "User directory", body = ApiResponse<UserListResponse>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    query: ListQuery,
) -> Result<ApiResponse<UserListResponse>, ApiError> {
    auth.require_role(&[Role::Admin, Role::Alumni])?;

    let mut find = User::find();
    if let Some(q) = &query.q {
        find = find.filter(
            Condition::any()
                .add(user::Column::Name.contains(q))
                .add(user::Column::Nim.contains(q))
                .add(user::Column::Email.contains(q)),
        );
    }

    let total = find.clone().count(&state.db).await?;
    let users = find
        .order_by_desc(user::Column::CreatedAt)
        .offset(query.offset())
        .limit(query.limit)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::success(UserListResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        meta: PageMeta::new(total, &query),
    }))
}

/// Create a user with an explicit role. Admin only.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "NIM, email or phone already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
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
            role_id: payload.role_id,
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

/// Fetch a user's profile. The user themselves or an admin.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserProfileResponse>),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub(crate) async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<UserProfileResponse>, ApiError> {
    auth.require_self_or_admin(id)?;

    let user = User::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::success(
        service::profile(&state.db, user).await?,
    ))
}

/// Update a user's account. The user themselves or an admin.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub(crate) async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<ApiResponse<UserResponse>, ApiError> {
    auth.require_self_or_admin(id)?;
    payload.validate()?;

    let user = User::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let mut active: user::ActiveModel = user.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(graduation_year) = payload.graduation_year {
        active.graduation_year = Set(graduation_year);
    }
    if let Some(new_password) = payload.password {
        active.password_hash = Set(password::hash_password(
            &new_password,
            state.config.bcrypt_cost,
        )?);
    }
    active.updated_at = Set(Utc::now().naive_utc());
    let user = active.update(&state.db).await?;

    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// Delete a user's account. The user themselves or an admin.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<MessageResponse>),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub(crate) async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    auth.require_self_or_admin(id)?;

    let user = User::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    user.delete(&state.db).await?;

    Ok(ApiResponse::success(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
