// Admin Category Management
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
use crate::models::{Category, CategoryCreate};
use crate::AppState;

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let categories: Repository<Category> = Repository::new("categories", state.pool.clone());
    let category = categories
        .insert_one(vec![
            ("id", json!(Uuid::new_v4().to_string()).into()),
            ("name", json!(payload.name).into()),
            ("description", json!(payload.description).into()),
            ("created_by", json!(current.0.id).into()),
            ("created_at", Utc::now().into()),
        ])
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id - Full replacement of name and description
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryCreate>,
) -> Result<Json<Category>, ApiError> {
    let categories: Repository<Category> = Repository::new("categories", state.pool.clone());
    let category = categories
        .update_404(
            by_id(&id),
            vec![
                ("name", json!(payload.name).into()),
                ("description", json!(payload.description).into()),
            ],
        )
        .await
        .map_err(not_found_as("Category not found"))?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - Succeeds even while prompts still reference
/// the category; those reads degrade to a null category name
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let categories: Repository<Category> = Repository::new("categories", state.pool.clone());
    categories
        .delete_404(by_id(&id))
        .await
        .map_err(not_found_as("Category not found"))?;
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}

fn by_id(id: &str) -> FilterData {
    FilterData {
        where_clause: Some(json!({ "id": id })),
        ..Default::default()
    }
}
