use utoipa::OpenApi;

use crate::controllers::auth::{
    AuthResponse, LoginRequest, MeRequest, RefreshRequest, RegisterRequest, TokenPairResponse,
};
use crate::controllers::jobs::{CreateJobRequest, JobListResponse, UpdateJobRequest};
use crate::controllers::users::{CreateUserRequest, UpdateUserRequest, UserListResponse};
use crate::error::{ErrorDetail, FieldError};
use crate::extractors::PageMeta;
use crate::models::job::JobResponse;
use crate::models::user::{UserProfileResponse, UserResponse};

/// OpenAPI documentation, served at `/api-docs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "AlumNet API",
        version = "0.1.0",
        description = "Alumni network backend: accounts, sessions, job board."
    ),
    paths(
        crate::controllers::auth::register,
        crate::controllers::auth::login,
        crate::controllers::auth::refresh,
        crate::controllers::auth::me,
        crate::controllers::auth::me_from_body,
        crate::controllers::users::list_users,
        crate::controllers::users::create_user,
        crate::controllers::users::get_user,
        crate::controllers::users::update_user,
        crate::controllers::users::delete_user,
        crate::controllers::jobs::list_jobs,
        crate::controllers::jobs::create_job,
        crate::controllers::jobs::get_job,
        crate::controllers::jobs::update_job,
        crate::controllers::jobs::delete_job,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            MeRequest,
            AuthResponse,
            TokenPairResponse,
            UserResponse,
            UserProfileResponse,
            UserListResponse,
            CreateUserRequest,
            UpdateUserRequest,
            JobResponse,
            JobListResponse,
            CreateJobRequest,
            UpdateJobRequest,
            PageMeta,
            ErrorDetail,
            FieldError,
        )
    ),
    tags(
        (name = "auth", description = "Authentication and session endpoints"),
        (name = "users", description = "User directory and account management"),
        (name = "jobs", description = "Job board endpoints")
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add JWT Bearer security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}
