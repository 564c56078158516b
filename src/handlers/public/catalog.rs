// Public Catalog Reads
use axum::{extract::State, Json};
use serde_json::json;

use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::models::{Category, Settings, Tag, SETTINGS_ID};
use crate::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories: Repository<Category> = Repository::new("categories", state.pool.clone());
    Ok(Json(categories.select_any(FilterData::default()).await?))
}

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags: Repository<Tag> = Repository::new("tags", state.pool.clone());
    Ok(Json(tags.select_any(FilterData::default()).await?))
}

/// GET /api/settings - Site branding singleton
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    let settings: Repository<Settings> = Repository::new("settings", state.pool.clone());
    settings
        .select_one(FilterData {
            where_clause: Some(json!({ "id": SETTINGS_ID })),
            ..Default::default()
        })
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Settings not found"))
}
