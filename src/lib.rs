pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared application context: connection pool and configuration, built once
/// at startup and injected into handlers and middleware through axum state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}
