use std::time::Duration;

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

use crate::error::ApiError;
use crate::extractors::{AuthUser, Json, ListQuery, PageMeta};
use crate::models::job::{self, Entity as Job, JobResponse};
use crate::response::ApiResponse;

use super::AppState;

const LIST_TTL: Duration = Duration::from_secs(60);
const ITEM_TTL: Duration = Duration::from_secs(300);

// ── Request / Response types ──

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateJobRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[validate(length(min = 1, message = "Job type is required"))]
    pub job_type: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateJobRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    pub company: Option<String>,
    pub content: Option<String>,
    pub job_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobListResponse {
    pub data: Vec<JobResponse>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/{id}", get(get_job).put(update_job).delete(delete_job))
}

// ── Handlers ──

/// List job postings, newest first. Public.
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(ListQuery),
    responses(
        (status = 200, description = "Job listings", body = ApiResponse<JobListResponse>)
    ),
    tag = "jobs"
)]
pub(crate) async fn list_jobs(
    State(state): State<AppState>,
    query: ListQuery,
) -> Result<ApiResponse<JobListResponse>, ApiError> {
    let cache_key = format!(
        "jobs:list:{}:{}:{}",
        query.page,
        query.limit,
        query.q.as_deref().unwrap_or("all")
    );

    if let Some(cached) = state.cache.get_json_lossy::<JobListResponse>(&cache_key).await {
        return Ok(ApiResponse::success(cached));
    }

    let mut find = Job::find();
    if let Some(q) = &query.q {
        find = find.filter(
            Condition::any()
                .add(job::Column::Title.contains(q))
                .add(job::Column::Company.contains(q))
                .add(job::Column::Content.contains(q)),
        );
    }

    let total = find.clone().count(&state.db).await?;
    let jobs = find
        .order_by_desc(job::Column::CreatedAt)
        .offset(query.offset())
        .limit(query.limit)
        .all(&state.db)
        .await?;

    let response = JobListResponse {
        data: jobs.into_iter().map(JobResponse::from).collect(),
        meta: PageMeta::new(total, &query),
    };

    state.cache.set_json_lossy(&cache_key, &response, LIST_TTL).await;

    Ok(ApiResponse::success(response))
}

/// Fetch a single job posting. Public.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job", body = ApiResponse<JobResponse>),
        (status = 404, description = "Job not found")
    ),
    tag = "jobs"
)]
pub(crate) async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<JobResponse>, ApiError> {
    let cache_key = format!("jobs:item:{}", id);

    if let Some(cached) = state.cache.get_json_lossy::<JobResponse>(&cache_key).await {
        return Ok(ApiResponse::success(cached));
    }

    let job = Job::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    let response = JobResponse::from(job);
    state.cache.set_json_lossy(&cache_key, &response, ITEM_TTL).await;

    Ok(ApiResponse::success(response))
}

/// Create a job posting. Any authenticated user.
#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = ApiResponse<JobResponse>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub(crate) async fn create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let now = Utc::now().naive_utc();
    let new_job = job::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        company: Set(payload.company),
        content: Set(payload.content),
        job_type: Set(payload.job_type),
        posted_by_id: Set(auth.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let job = new_job.insert(&state.db).await?;

    state.cache.del_prefix_lossy("jobs:").await;

    Ok((
        StatusCode::CREATED,
        axum::Json(ApiResponse::success(JobResponse::from(job))),
    ))
}

/// Update a job posting. Owner or admin.
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated", body = ApiResponse<JobResponse>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub(crate) async fn update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<ApiResponse<JobResponse>, ApiError> {
    payload.validate()?;

    // Existence is checked before ownership, so a missing job is reported
    // as 404 to any authenticated caller.
    let job = Job::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    auth.require_owner_or_admin(job.posted_by_id)?;

    let mut active: job::ActiveModel = job.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(company) = payload.company {
        active.company = Set(company);
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(job_type) = payload.job_type {
        active.job_type = Set(job_type);
    }
    active.updated_at = Set(Utc::now().naive_utc());
    let job = active.update(&state.db).await?;

    state.cache.del_prefix_lossy("jobs:").await;

    Ok(ApiResponse::success(JobResponse::from(job)))
}

/// Delete a job posting. Owner or admin.
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job deleted", body = ApiResponse<MessageResponse>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub(crate) async fn delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let job = Job::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    auth.require_owner_or_admin(job.posted_by_id)?;

    job.delete(&state.db).await?;

    state.cache.del_prefix_lossy("jobs:").await;

    Ok(ApiResponse::success(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}
