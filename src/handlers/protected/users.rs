// Admin User Management
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{hash_password, validate_email_format};
use crate::database::{DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::handlers::not_found_as;
use crate::middleware::CurrentUser;
use crate::models::{Role, User, UserCreate};
use crate::AppState;

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users: Repository<User> = Repository::new("users", state.pool.clone());
    Ok(Json(users.select_any(FilterData::default()).await?))
}

/// POST /api/users - Admin account creation; the requested role is honored
/// here, with anything unrecognized falling back to author
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let email = payload.email.trim().to_lowercase();
    if !validate_email_format(&email) {
        return Err(ApiError::validation_error("Invalid email format"));
    }
    let role = Role::parse(payload.role.as_deref().unwrap_or("author"));
    let password_hash = hash_password(&payload.password)?;

    let users: Repository<User> = Repository::new("users", state.pool.clone());
    let user = users
        .insert_one(vec![
            ("id", json!(Uuid::new_v4().to_string()).into()),
            ("email", json!(email).into()),
            ("password_hash", json!(password_hash).into()),
            ("name", json!(payload.name).into()),
            ("role", json!(role.as_str()).into()),
            ("created_at", Utc::now().into()),
        ])
        .await
        .map_err(|err| match err {
            DatabaseError::Conflict(_) => ApiError::bad_request("Email already registered"),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// DELETE /api/users/:id - Admins cannot delete their own account
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if current.0.id == id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }

    let users: Repository<User> = Repository::new("users", state.pool.clone());
    users
        .delete_404(FilterData {
            where_clause: Some(json!({ "id": id })),
            ..Default::default()
        })
        .await
        .map_err(not_found_as("User not found"))?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
