use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Base connection string; the database name is substituted into its path.
    pub url: String,
    pub name: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub token_secret: String,
    pub token_expiry_days: i64,
    pub cors_origins: Vec<String>,
}

/// Seed values for the first-startup admin account and settings record.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub company_name: String,
}

impl AppConfig {
    /// Build configuration from the environment. `DATABASE_URL` and
    /// `SECRET_KEY` are required; everything else has a development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?,
            name: env::var("DB_NAME").unwrap_or_else(|_| "prompti".to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        };

        let security = SecurityConfig {
            token_secret: env::var("SECRET_KEY").map_err(|_| ConfigError::MissingEnv("SECRET_KEY"))?,
            token_expiry_days: env::var("TOKEN_EXPIRY_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            cors_origins: parse_origins(env::var("CORS_ORIGINS").as_deref().unwrap_or("*")),
        };

        let bootstrap = BootstrapConfig {
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
            company_name: env::var("COMPANY_NAME").unwrap_or_else(|_| "Prompti".to_string()),
        };

        Ok(Self { database, security, bootstrap })
    }
}

/// Split a comma-separated origin list; "*" (or an empty value) means any origin.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_origin_lists() {
        let origins = parse_origins("http://localhost:3000, https://app.example.com");
        assert_eq!(origins, vec!["http://localhost:3000", "https://app.example.com"]);
    }

    #[test]
    fn wildcard_is_a_single_entry() {
        assert_eq!(parse_origins("*"), vec!["*"]);
    }

    #[test]
    fn empty_origins_are_dropped() {
        assert_eq!(parse_origins("a,,b,"), vec!["a", "b"]);
    }
}
