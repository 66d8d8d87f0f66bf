//! Registration, login, token refresh and profile lookup.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::auth::{jwt, password, session};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{city, faculty, major, province, role, user};

/// Everything needed to create an account.
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub nim: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub enrollment_year: i32,
    pub graduation_year: i32,
    /// When absent the default role is looked up by name.
    pub role_id: Option<Uuid>,
    pub province_id: Uuid,
    pub city_id: Uuid,
    pub faculty_id: Uuid,
    pub major_id: Uuid,
    pub verification_file_url: String,
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Create a new user account.
///
/// Uniqueness is checked before insert so conflicts map to deterministic
/// messages, with NIM taking priority over email over phone number.
pub async fn register(
    db: &DatabaseConnection,
    config: &Config,
    data: RegisterData,
) -> Result<user::Model, ApiError> {
    let existing = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Nim.eq(data.nim.as_str()))
                .add(user::Column::Email.eq(data.email.as_str()))
                .add(user::Column::PhoneNumber.eq(data.phone_number.as_str())),
        )
        .all(db)
        .await?;
    if existing.iter().any(|u| u.nim == data.nim) {
        return Err(ApiError::Conflict("NIM already registered".to_string()));
    }
    if existing.iter().any(|u| u.email == data.email) {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }
    if existing.iter().any(|u| u.phone_number == data.phone_number) {
        return Err(ApiError::Conflict(
            "Phone number already registered".to_string(),
        ));
    }

    let city = city::Entity::find_by_id(data.city_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::BadRequest("City not found".to_string()))?;
    if city.province_id != data.province_id {
        return Err(ApiError::BadRequest(
            "City does not belong to the selected province".to_string(),
        ));
    }

    let role_id = match data.role_id {
        Some(id) => {
            role::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| ApiError::BadRequest("Role not found".to_string()))?
                .id
        }
        None => {
            role::Entity::find()
                .filter(role::Column::Name.eq(role::DEFAULT_ROLE))
                .one(db)
                .await?
                .ok_or_else(|| {
                    ApiError::Configuration(format!(
                        "Default role '{}' not found",
                        role::DEFAULT_ROLE
                    ))
                })?
                .id
        }
    };

    let password_hash = password::hash_password(&data.password, config.bcrypt_cost)?;
    let now = Utc::now().naive_utc();

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        nim: Set(data.nim),
        name: Set(data.name),
        email: Set(data.email),
        password_hash: Set(password_hash),
        phone_number: Set(data.phone_number),
        enrollment_year: Set(data.enrollment_year),
        graduation_year: Set(data.graduation_year),
        role_id: Set(role_id),
        province_id: Set(data.province_id),
        city_id: Set(data.city_id),
        faculty_id: Set(data.faculty_id),
        major_id: Set(data.major_id),
        verification_file_url: Set(data.verification_file_url),
        refresh_token: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(new_user.insert(db).await?)
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid NIM or password".to_string())
}

/// Authenticate by NIM and password, issuing a fresh token pair.
///
/// Unknown NIM and wrong password return the same error so the response
/// does not reveal whether the account exists.
pub async fn login(
    db: &DatabaseConnection,
    config: &Config,
    nim: &str,
    plain_password: &str,
) -> Result<(user::Model, AuthTokens), ApiError> {
    let user_model = user::Entity::find()
        .filter(user::Column::Nim.eq(nim))
        .one(db)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !password::verify_password(plain_password, &user_model.password_hash) {
        return Err(invalid_credentials());
    }

    let tokens = issue_tokens(db, config, &user_model).await?;
    Ok((user_model, tokens))
}

/// Sign a new access/refresh pair for the user and persist the refresh
/// token as their single current session.
pub async fn issue_tokens(
    db: &DatabaseConnection,
    config: &Config,
    user_model: &user::Model,
) -> Result<AuthTokens, ApiError> {
    // A missing role row is a broken deployment; signing a token with an
    // empty role would only surface later as a baffling 401.
    let role_name = role::Entity::find_by_id(user_model.role_id)
        .one(db)
        .await?
        .map(|r| r.name)
        .ok_or_else(|| {
            ApiError::Configuration(format!("Role {} not found", user_model.role_id))
        })?;

    let user_id = user_model.id.to_string();
    let access_token = jwt::sign_access_token(
        &user_id,
        &role_name,
        &user_model.nim,
        &config.access_token_secret,
        config.access_token_expiry_hours,
    )?;
    let refresh_token = jwt::sign_refresh_token(
        &user_id,
        &role_name,
        &user_model.nim,
        &config.refresh_token_secret,
        config.refresh_token_expiry_days,
    )?;

    session::set_current_refresh(db, user_model.id, &refresh_token).await?;

    Ok(AuthTokens {
        access_token,
        refresh_token,
    })
}

/// Rotate a refresh token: validate it, check it is the one on record,
/// then issue and store a new pair.
///
/// A token that was already rotated away fails the exact-match check, so
/// replaying an old refresh token ends the attack with a 401.
pub async fn refresh(
    db: &DatabaseConnection,
    config: &Config,
    old_refresh_token: &str,
) -> Result<AuthTokens, ApiError> {
    fn stale() -> ApiError {
        ApiError::Unauthorized("Invalid refresh token".to_string())
    }

    let claims = jwt::verify_refresh_token(old_refresh_token, &config.refresh_token_secret)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| stale())?;

    let user_model = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(stale)?;

    if user_model.refresh_token.as_deref() != Some(old_refresh_token) {
        return Err(stale());
    }

    issue_tokens(db, config, &user_model).await
}

/// Resolve an access token into the full user profile.
pub async fn me(
    db: &DatabaseConnection,
    config: &Config,
    access_token: &str,
) -> Result<user::UserProfileResponse, ApiError> {
    let claims = jwt::verify_access_token(access_token, &config.access_token_secret)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid access token".to_string()))?;

    let user_model = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    profile(db, user_model).await
}

/// Build the expanded profile, resolving related names.
pub async fn profile(
    db: &DatabaseConnection,
    user_model: user::Model,
) -> Result<user::UserProfileResponse, ApiError> {
    // Foreign keys guarantee the rows exist; fall back to empty names
    // rather than failing the whole request.
    let role_name = role::Entity::find_by_id(user_model.role_id)
        .one(db)
        .await?
        .map(|r| r.name)
        .unwrap_or_default();
    let province_name = province::Entity::find_by_id(user_model.province_id)
        .one(db)
        .await?
        .map(|p| p.name)
        .unwrap_or_default();
    let city_name = city::Entity::find_by_id(user_model.city_id)
        .one(db)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();
    let faculty_name = faculty::Entity::find_by_id(user_model.faculty_id)
        .one(db)
        .await?
        .map(|f| f.name)
        .unwrap_or_default();
    let major_name = major::Entity::find_by_id(user_model.major_id)
        .one(db)
        .await?
        .map(|m| m.name)
        .unwrap_or_default();

    Ok(user::UserProfileResponse {
        id: user_model.id,
        nim: user_model.nim,
        name: user_model.name,
        email: user_model.email,
        phone_number: user_model.phone_number,
        enrollment_year: user_model.enrollment_year,
        graduation_year: user_model.graduation_year,
        role: role_name,
        province: province_name,
        city: city_name,
        faculty: faculty_name,
        major: major_name,
        verification_file_url: user_model.verification_file_url,
        created_at: user_model.created_at,
    })
}
