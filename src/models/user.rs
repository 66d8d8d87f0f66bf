use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User entity - the registered alumni account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Student identification number, the login identifier.
    #[sea_orm(unique)]
    pub nim: String,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Password hash (excluded from serialization via serde skip)
    #[serde(skip_serializing)]
    #[schema(read_only)]
    pub password_hash: String,

    #[sea_orm(unique)]
    pub phone_number: String,

    pub enrollment_year: i32,
    pub graduation_year: i32,

    pub role_id: Uuid,
    pub province_id: Uuid,
    pub city_id: Uuid,
    pub faculty_id: Uuid,
    pub major_id: Uuid,

    pub verification_file_url: String,

    /// The one currently valid refresh token, if the user has an open
    /// session. Overwritten on login and on every refresh.
    #[serde(skip_serializing)]
    #[schema(read_only)]
    pub refresh_token: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
    #[sea_orm(
        belongs_to = "super::province::Entity",
        from = "Column::ProvinceId",
        to = "super::province::Column::Id"
    )]
    Province,
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityId",
        to = "super::city::Column::Id"
    )]
    City,
    #[sea_orm(
        belongs_to = "super::faculty::Entity",
        from = "Column::FacultyId",
        to = "super::faculty::Column::Id"
    )]
    Faculty,
    #[sea_orm(
        belongs_to = "super::major::Entity",
        from = "Column::MajorId",
        to = "super::major::Column::Id"
    )]
    Major,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::province::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Province.def()
    }
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl Related<super::faculty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::major::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Major.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Public user data (safe to return in API responses).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub nim: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub enrollment_year: i32,
    pub graduation_year: i32,
    pub role_id: Uuid,
    pub province_id: Uuid,
    pub city_id: Uuid,
    pub faculty_id: Uuid,
    pub major_id: Uuid,
    pub verification_file_url: String,
    pub created_at: NaiveDateTime,
}

impl From<Model> for UserResponse {
    fn from(user: Model) -> Self {
        UserResponse {
            id: user.id,
            nim: user.nim,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            enrollment_year: user.enrollment_year,
            graduation_year: user.graduation_year,
            role_id: user.role_id,
            province_id: user.province_id,
            city_id: user.city_id,
            faculty_id: user.faculty_id,
            major_id: user.major_id,
            verification_file_url: user.verification_file_url,
            created_at: user.created_at,
        }
    }
}

/// Expanded profile with related names resolved, returned by `/api/auth/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub nim: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub enrollment_year: i32,
    pub graduation_year: i32,
    pub role: String,
    pub province: String,
    pub city: String,
    pub faculty: String,
    pub major: String,
    pub verification_file_url: String,
    pub created_at: NaiveDateTime,
}
