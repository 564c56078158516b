use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put, MethodRouter};
use axum::{middleware, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use prompti_api::config::AppConfig;
use prompti_api::middleware::{require_admin, require_auth};
use prompti_api::services::bootstrap;
use prompti_api::{database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("prompti_api=info,tower_http=info")),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    let pool = database::connect(&config.database).await?;
    bootstrap::seed(&pool, &config).await?;

    let state = AppState { pool, config };
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("prompti-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .layer(cors_layer(&state.config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unauthenticated surface, plus the three paths that mix a public read with
/// an admin-guarded mutation on the same route.
fn public_routes(state: AppState) -> Router<AppState> {
    use prompti_api::handlers::protected::{categories, settings, tags};
    use prompti_api::handlers::public::{auth, catalog, prompti};

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/categories",
            get(catalog::list_categories)
                .merge(admin_guarded(state.clone(), post(categories::create_category))),
        )
        .route(
            "/api/tags",
            get(catalog::list_tags).merge(admin_guarded(state.clone(), post(tags::create_tag))),
        )
        .route(
            "/api/settings",
            get(catalog::get_settings)
                .merge(admin_guarded(state.clone(), put(settings::update_settings))),
        )
        .route("/api/public/prompti", get(prompti::list_public_prompti))
        .route("/api/public/prompti/:id", get(prompti::get_public_prompti))
        .route("/api/public/prompti/:id/rate", post(prompti::rate_prompti))
        .route("/api/public/prompti/:id/ratings", get(prompti::list_prompti_ratings))
}

/// Routes for any authenticated user
fn user_routes(state: AppState) -> Router<AppState> {
    use prompti_api::handlers::protected::{auth, prompti};

    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/prompti", get(prompti::list_my_prompti).post(prompti::create_prompti))
        .route(
            "/api/prompti/:id",
            get(prompti::get_prompti)
                .put(prompti::update_prompti)
                .delete(prompti::delete_prompti),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Admin-only routes on paths with no public methods
fn admin_routes(state: AppState) -> Router<AppState> {
    use prompti_api::handlers::protected::{categories, tags, users};

    Router::new()
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id", delete(users::delete_user))
        .route(
            "/api/categories/:id",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route("/api/tags/:id", put(tags::update_tag).delete(tags::delete_tag))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Wrap a single method router in the auth + admin guards. Layers wrap
/// outside-in, so require_auth (added last) runs first.
fn admin_guarded(state: AppState, routes: MethodRouter<AppState>) -> MethodRouter<AppState> {
    routes
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, require_auth))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new().allow_origin(parsed).allow_methods(Any).allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "name": "Prompti API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Content management backend for reusable prompt snippets",
        "endpoints": {
            "auth": "/api/auth/register, /api/auth/login (public), /api/auth/me (user)",
            "users": "/api/users (admin)",
            "catalog": "/api/categories, /api/tags (public read, admin write)",
            "prompti": "/api/prompti (user, owner-scoped)",
            "public": "/api/public/prompti[/:id[/rate|/ratings]] (public)",
            "settings": "/api/settings (public read, admin write)"
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
