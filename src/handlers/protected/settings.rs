// Admin Settings Update
use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::json;

use crate::database::{FieldValue, Repository};
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::handlers::not_found_as;
use crate::models::{Settings, SettingsUpdate, SETTINGS_ID};
use crate::AppState;

/// PUT /api/settings - Partial update of the singleton settings record;
/// 404 if seeding never ran and the record does not exist
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<SettingsUpdate>,
) -> Result<Json<Settings>, ApiError> {
    let mut fields: Vec<(&str, FieldValue)> = Vec::new();
    if let Some(logo_url) = payload.logo_url {
        fields.push(("logo_url", json!(logo_url).into()));
    }
    if let Some(company_name) = payload.company_name {
        fields.push(("company_name", json!(company_name).into()));
    }
    if let Some(company_website) = payload.company_website {
        fields.push(("company_website", json!(company_website).into()));
    }
    if let Some(contact_email) = payload.contact_email {
        fields.push(("contact_email", json!(contact_email).into()));
    }
    fields.push(("updated_at", Utc::now().into()));

    let settings: Repository<Settings> = Repository::new("settings", state.pool.clone());
    let updated = settings
        .update_404(
            FilterData {
                where_clause: Some(json!({ "id": SETTINGS_ID })),
                ..Default::default()
            },
            fields,
        )
        .await
        .map_err(not_found_as("Settings not found"))?;
    Ok(Json(updated))
}
