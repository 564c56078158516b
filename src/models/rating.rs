use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Anonymous, append-only rating of a published prompt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: String,
    pub prompti_id: String,
    pub rating: i32,
    pub feedback: String,
    pub user_name: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RatingCreate {
    pub rating: i32,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
}
