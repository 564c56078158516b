// Owner-Scoped Prompt CRUD
//
// Every lookup carries the author id in its filter, so a prompt owned by
// someone else is indistinguishable from one that does not exist: both are a
// 404. Ownership never surfaces as a 403.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::{FieldValue, Repository};
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::handlers::not_found_as;
use crate::middleware::CurrentUser;
use crate::models::{Prompt, PromptCreate, PromptUpdate, PromptView};
use crate::services::{expand_prompt, expand_prompts};
use crate::AppState;

/// POST /api/prompti
pub async fn create_prompti(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<PromptCreate>,
) -> Result<(StatusCode, Json<PromptView>), ApiError> {
    let now = Utc::now();
    let prompts: Repository<Prompt> = Repository::new("prompti", state.pool.clone());
    let prompt = prompts
        .insert_one(vec![
            ("id", json!(Uuid::new_v4().to_string()).into()),
            ("title", json!(payload.title).into()),
            ("body", json!(payload.body).into()),
            ("category_id", json!(payload.category_id).into()),
            ("tag_ids", json!(payload.tag_ids).into()),
            ("author_id", json!(current.0.id).into()),
            ("published", json!(payload.published).into()),
            ("created_at", now.into()),
            ("updated_at", now.into()),
        ])
        .await?;

    let view = expand_prompt(&state.pool, prompt, Some(current.0.name)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/prompti - The caller's own prompts, published or not
pub async fn list_my_prompti(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<PromptView>>, ApiError> {
    let prompts: Repository<Prompt> = Repository::new("prompti", state.pool.clone());
    let rows = prompts
        .select_any(FilterData {
            where_clause: Some(json!({ "author_id": current.0.id })),
            ..Default::default()
        })
        .await?;
    Ok(Json(expand_prompts(&state.pool, rows, Some(current.0.name.as_str())).await?))
}

/// GET /api/prompti/:id
pub async fn get_prompti(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<PromptView>, ApiError> {
    let prompts: Repository<Prompt> = Repository::new("prompti", state.pool.clone());
    let prompt = prompts
        .select_one(owned_by(&id, &current.0.id))
        .await?
        .ok_or_else(|| ApiError::not_found("Prompti not found"))?;
    Ok(Json(expand_prompt(&state.pool, prompt, Some(current.0.name)).await?))
}

/// PUT /api/prompti/:id - Partial update; absent fields are left untouched
pub async fn update_prompti(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<PromptUpdate>,
) -> Result<Json<PromptView>, ApiError> {
    let mut fields: Vec<(&str, FieldValue)> = Vec::new();
    if let Some(title) = payload.title {
        fields.push(("title", json!(title).into()));
    }
    if let Some(body) = payload.body {
        fields.push(("body", json!(body).into()));
    }
    if let Some(category_id) = payload.category_id {
        fields.push(("category_id", json!(category_id).into()));
    }
    if let Some(tag_ids) = payload.tag_ids {
        fields.push(("tag_ids", json!(tag_ids).into()));
    }
    if let Some(published) = payload.published {
        fields.push(("published", json!(published).into()));
    }
    fields.push(("updated_at", Utc::now().into()));

    let prompts: Repository<Prompt> = Repository::new("prompti", state.pool.clone());
    let prompt = prompts
        .update_404(owned_by(&id, &current.0.id), fields)
        .await
        .map_err(not_found_as("Prompti not found or unauthorized"))?;
    Ok(Json(expand_prompt(&state.pool, prompt, Some(current.0.name)).await?))
}

/// DELETE /api/prompti/:id
pub async fn delete_prompti(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let prompts: Repository<Prompt> = Repository::new("prompti", state.pool.clone());
    prompts
        .delete_404(owned_by(&id, &current.0.id))
        .await
        .map_err(not_found_as("Prompti not found or unauthorized"))?;
    Ok(Json(json!({ "message": "Prompti deleted successfully" })))
}

fn owned_by(id: &str, author_id: &str) -> FilterData {
    FilterData {
        where_clause: Some(json!({ "id": id, "author_id": author_id })),
        ..Default::default()
    }
}
