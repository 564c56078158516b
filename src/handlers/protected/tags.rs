// Admin Tag Management
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::handlers::not_found_as;
use crate::middleware::CurrentUser;
use crate::models::{Tag, TagCreate};
use crate::AppState;

/// POST /api/tags
pub async fn create_tag(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<TagCreate>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let tags: Repository<Tag> = Repository::new("tags", state.pool.clone());
    let tag = tags
        .insert_one(vec![
            ("id", json!(Uuid::new_v4().to_string()).into()),
            ("name", json!(payload.name).into()),
            ("created_by", json!(current.0.id).into()),
            ("created_at", Utc::now().into()),
        ])
        .await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /api/tags/:id
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TagCreate>,
) -> Result<Json<Tag>, ApiError> {
    let tags: Repository<Tag> = Repository::new("tags", state.pool.clone());
    let tag = tags
        .update_404(by_id(&id), vec![("name", json!(payload.name).into())])
        .await
        .map_err(not_found_as("Tag not found"))?;
    Ok(Json(tag))
}

/// DELETE /api/tags/:id
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let tags: Repository<Tag> = Repository::new("tags", state.pool.clone());
    tags.delete_404(by_id(&id))
        .await
        .map_err(not_found_as("Tag not found"))?;
    Ok(Json(json!({ "message": "Tag deleted successfully" })))
}

fn by_id(id: &str) -> FilterData {
    FilterData {
        where_clause: Some(json!({ "id": id })),
        ..Default::default()
    }
}
