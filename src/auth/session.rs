//! Single-session refresh token store.
//!
//! Each user holds at most one valid refresh token, stored on the user row.
//! Writing a new token invalidates whatever was there; concurrent logins
//! race with last-writer-wins semantics.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::user;

/// Store the given refresh token as the user's only valid session token.
pub async fn set_current_refresh(
    db: &DatabaseConnection,
    user_id: Uuid,
    token: &str,
) -> Result<(), ApiError> {
    user::Entity::update_many()
        .col_expr(user::Column::RefreshToken, Expr::value(token))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Fetch the user's currently stored refresh token, if any.
pub async fn current_refresh(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<String>, ApiError> {
    let user = user::Entity::find_by_id(user_id).one(db).await?;
    Ok(user.and_then(|u| u.refresh_token))
}

/// Drop the user's session token, ending the session.
pub async fn clear_current_refresh(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<(), ApiError> {
    user::Entity::update_many()
        .col_expr(user::Column::RefreshToken, Expr::value(None::<String>))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}
