use axum::{Extension, Json};

use crate::middleware::CurrentUser;
use crate::models::User;

/// GET /api/auth/me - The authenticated user, as reloaded by the middleware
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.0)
}
