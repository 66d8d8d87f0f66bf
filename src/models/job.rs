use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Job posting entity - owned by the user who posted it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    pub company: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Free-form type label (e.g. "Full-time", "Internship").
    pub job_type: String,

    pub posted_by_id: Uuid,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PostedById",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Job data returned by the API. Deserialize is kept so cached copies can
/// round-trip through the cache layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub content: String,
    pub job_type: String,
    pub posted_by_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Model> for JobResponse {
    fn from(job: Model) -> Self {
        JobResponse {
            id: job.id,
            title: job.title,
            company: job.company,
            content: job.content,
            job_type: job.job_type,
            posted_by_id: job.posted_by_id,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
