// Startup Seeding
//
// Idempotent by construction: the schema DDL is IF NOT EXISTS, the admin
// insert lands on the users.email unique index with ON CONFLICT DO NOTHING,
// and the settings insert lands on its fixed primary key. Replicas racing
// through this at the same moment converge on one admin and one settings row.
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::database::{schema, DatabaseError};
use crate::error::ApiError;
use crate::models::{Role, SETTINGS_ID};

pub async fn seed(pool: &PgPool, config: &AppConfig) -> Result<(), ApiError> {
    schema::ensure_schema(pool).await.map_err(ApiError::from)?;

    let password_hash = hash_password(&config.bootstrap.admin_password)?;
    let admin_email = config.bootstrap.admin_email.to_lowercase();
    let inserted = sqlx::query(
        "INSERT INTO users (id, email, password_hash, name, role, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&admin_email)
    .bind(&password_hash)
    .bind(&config.bootstrap.admin_name)
    .bind(Role::Admin.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(DatabaseError::from)?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Seeded admin account {}", admin_email);
    }

    sqlx::query(
        "INSERT INTO settings (id, logo_url, company_name, company_website, contact_email, updated_at) \
         VALUES ($1, '', $2, '', '', $3) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(SETTINGS_ID)
    .bind(&config.bootstrap.company_name)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(DatabaseError::from)?;

    Ok(())
}
