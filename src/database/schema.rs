// Schema Bootstrap
//
// All DDL is idempotent so startup can run it unconditionally; concurrent
// instances racing through it converge on the same schema.
use sqlx::PgPool;

use crate::database::DatabaseError;

const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        name TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_by TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tags (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        created_by TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS prompti (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        category_id TEXT NOT NULL,
        tag_ids TEXT[] NOT NULL DEFAULT '{}',
        author_id TEXT NOT NULL,
        published BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS ratings (
        id TEXT PRIMARY KEY,
        prompti_id TEXT NOT NULL,
        rating INTEGER NOT NULL,
        feedback TEXT NOT NULL DEFAULT '',
        user_name TEXT NOT NULL DEFAULT '',
        user_email TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS settings (
        id TEXT PRIMARY KEY,
        logo_url TEXT NOT NULL DEFAULT '',
        company_name TEXT NOT NULL DEFAULT '',
        company_website TEXT NOT NULL DEFAULT '',
        contact_email TEXT NOT NULL DEFAULT '',
        updated_at TIMESTAMPTZ NOT NULL
    )",
];

const INDEXES: &[&str] = &[
    // Email uniqueness is enforced here, not in application code; concurrent
    // registrations of the same address lose the race at the index.
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)",
    "CREATE INDEX IF NOT EXISTS prompti_author_id_idx ON prompti (author_id)",
    "CREATE INDEX IF NOT EXISTS prompti_published_idx ON prompti (published)",
    "CREATE INDEX IF NOT EXISTS ratings_prompti_id_idx ON ratings (prompti_id)",
];

/// Create every table and index the service uses if it does not already exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for ddl in TABLES.iter().chain(INDEXES.iter()) {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
