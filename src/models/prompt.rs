use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored prompt. `category_id` and `tag_ids` are plain references with no
/// storage-level integrity; reads resolve them defensively.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub body: String,
    pub category_id: String,
    pub tag_ids: Vec<String>,
    pub author_id: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PromptCreate {
    pub title: String,
    pub body: String,
    pub category_id: String,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<String>,
    pub tag_ids: Option<Vec<String>>,
    pub published: Option<bool>,
}

/// Prompt joined with its display names and live rating statistics. This is
/// the only shape the read endpoints return.
#[derive(Debug, Serialize)]
pub struct PromptView {
    #[serde(flatten)]
    pub prompt: Prompt,
    pub category_name: Option<String>,
    pub tag_names: Vec<String>,
    pub author_name: String,
    pub average_rating: f64,
    pub rating_count: i64,
}
