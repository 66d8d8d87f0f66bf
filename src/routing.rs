use axum::Router;

use crate::controllers::{self, AppState};

/// Assemble all API routes under their `/api` prefixes.
pub fn build_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", controllers::auth::routes())
        .nest("/api/users", controllers::users::routes())
        .nest("/api/jobs", controllers::jobs::routes())
}
