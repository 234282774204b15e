use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be a number, got '{1}'")]
    NotANumber(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub static_files_path: Option<String>,
    pub cors_origins: Vec<String>,
    /// Maximum rows returned by the search endpoints.
    pub search_limit: i64,
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber(name, raw))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", "8080")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:callsheet.db?mode=rwc".to_string()),
            static_files_path: env::var("STATIC_FILES_PATH").ok(),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8080,http://127.0.0.1:8080".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            search_limit: parse_var("SEARCH_LIMIT", "20")?,
        })
    }
}
