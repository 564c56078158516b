// Public Prompt Surface
//
// Everything here is unauthenticated and scoped to published prompts at the
// filter level, except the ratings list which returns whatever exists for
// the given id (an unknown id is just an empty list).
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::models::{Prompt, PromptView, Rating, RatingCreate};
use crate::services::{expand_prompt, expand_prompts};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PublicPromptQuery {
    pub category_id: Option<String>,
    pub search: Option<String>,
}

/// GET /api/public/prompti - Published prompts, optionally narrowed by
/// category and a case-insensitive substring search over title or body
pub async fn list_public_prompti(
    State(state): State<AppState>,
    Query(params): Query<PublicPromptQuery>,
) -> Result<Json<Vec<PromptView>>, ApiError> {
    let mut where_clause = json!({ "published": true });
    if let Some(category_id) = params.category_id.filter(|c| !c.is_empty()) {
        where_clause["category_id"] = json!(category_id);
    }
    if let Some(search) = params.search.filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", escape_like(search.trim()));
        where_clause["$or"] = json!([
            { "title": { "$ilike": pattern } },
            { "body": { "$ilike": pattern } }
        ]);
    }

    let prompts: Repository<Prompt> = Repository::new("prompti", state.pool.clone());
    let rows = prompts
        .select_any(FilterData {
            where_clause: Some(where_clause),
            ..Default::default()
        })
        .await?;
    Ok(Json(expand_prompts(&state.pool, rows, None).await?))
}

/// GET /api/public/prompti/:id
pub async fn get_public_prompti(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PromptView>, ApiError> {
    let prompts: Repository<Prompt> = Repository::new("prompti", state.pool.clone());
    let prompt = prompts
        .select_one(published_by_id(&id))
        .await?
        .ok_or_else(|| ApiError::not_found("Prompti not found"))?;
    Ok(Json(expand_prompt(&state.pool, prompt, None).await?))
}

/// POST /api/public/prompti/:id/rate - Anonymous rating of a published prompt
pub async fn rate_prompti(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RatingCreate>,
) -> Result<(StatusCode, Json<Rating>), ApiError> {
    if !(1..=5).contains(&payload.rating) {
        return Err(ApiError::validation_error("Rating must be between 1 and 5"));
    }

    let prompts: Repository<Prompt> = Repository::new("prompti", state.pool.clone());
    prompts
        .select_one(published_by_id(&id))
        .await?
        .ok_or_else(|| ApiError::not_found("Prompti not found"))?;

    // Append-only: no dedup and no rate limiting
    let ratings: Repository<Rating> = Repository::new("ratings", state.pool.clone());
    let rating = ratings
        .insert_one(vec![
            ("id", json!(Uuid::new_v4().to_string()).into()),
            ("prompti_id", json!(id).into()),
            ("rating", json!(payload.rating).into()),
            ("feedback", json!(payload.feedback).into()),
            ("user_name", json!(payload.user_name).into()),
            ("user_email", json!(payload.user_email).into()),
            ("created_at", Utc::now().into()),
        ])
        .await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

/// GET /api/public/prompti/:id/ratings
pub async fn list_prompti_ratings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Rating>>, ApiError> {
    let ratings: Repository<Rating> = Repository::new("ratings", state.pool.clone());
    Ok(Json(
        ratings
            .select_any(FilterData {
                where_clause: Some(json!({ "prompti_id": id })),
                ..Default::default()
            })
            .await?,
    ))
}

fn published_by_id(id: &str) -> FilterData {
    FilterData {
        where_clause: Some(json!({ "id": id, "published": true })),
        ..Default::default()
    }
}

/// Escape LIKE/ILIKE metacharacters so a search term only ever matches as a
/// literal substring.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
