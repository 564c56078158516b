// Registration and Login
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_token, hash_password, validate_email_format, verify_password};
use crate::database::{DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::models::{Role, TokenResponse, User, UserCreate, UserLogin};
use crate::AppState;

/// POST /api/auth/register - Create an author account
///
/// Self-registration always persists role author; any requested role is
/// ignored. Duplicate emails lose at the unique index, not at a pre-check.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let email = payload.email.trim().to_lowercase();
    if !validate_email_format(&email) {
        return Err(ApiError::validation_error("Invalid email format"));
    }
    let password_hash = hash_password(&payload.password)?;

    let users: Repository<User> = Repository::new("users", state.pool.clone());
    let user = users
        .insert_one(vec![
            ("id", json!(Uuid::new_v4().to_string()).into()),
            ("email", json!(email).into()),
            ("password_hash", json!(password_hash).into()),
            ("name", json!(payload.name).into()),
            ("role", json!(Role::Author.as_str()).into()),
            ("created_at", Utc::now().into()),
        ])
        .await
        .map_err(|err| match err {
            DatabaseError::Conflict(_) => ApiError::bad_request("Email already registered"),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/auth/login - Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();

    let users: Repository<User> = Repository::new("users", state.pool.clone());
    let user = users
        .select_one(FilterData {
            where_clause: Some(json!({ "email": email })),
            ..Default::default()
        })
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(invalid_credentials());
    }

    let token = generate_token(&user.id, &state.config.security)?;
    Ok(Json(TokenResponse::new(token, user)))
}

// Unknown email and wrong password must be indistinguishable to the client
fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid email or password")
}
