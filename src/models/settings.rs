use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Singleton site-branding record, keyed by [`SETTINGS_ID`].
pub const SETTINGS_ID: &str = "app_settings";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Settings {
    pub id: String,
    pub logo_url: String,
    pub company_name: String,
    pub company_website: String,
    pub contact_email: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    pub logo_url: Option<String>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub contact_email: Option<String>,
}
