use dotenvy::dotenv;
use std::env;
use thiserror::Error;

use crate::routes::todos::schema::{DEFAULT_DESCRIPTION_MAX_LEN, DEFAULT_TITLE_MAX_LEN};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} missing, it is required")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Absent means the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub cors_origin: Option<String>,
    pub title_max_len: usize,
    pub description_max_len: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv().is_ok();

        let port = parse_var("PORT", "u16 number")?.ok_or(ConfigError::Missing("PORT"))?;
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            jwt_secret,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
            title_max_len: parse_length("TODO_TITLE_MAX_LEN")?.unwrap_or(DEFAULT_TITLE_MAX_LEN),
            description_max_len: parse_length("TODO_DESCRIPTION_MAX_LEN")?
                .unwrap_or(DEFAULT_DESCRIPTION_MAX_LEN),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, expected, value }),
        Err(_) => Ok(None),
    }
}

fn parse_length(name: &'static str) -> Result<Option<usize>, ConfigError> {
    check_length(name, env::var(name).ok())
}

/// A length limit of zero would reject every value.
fn check_length(name: &'static str, raw: Option<String>) -> Result<Option<usize>, ConfigError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    match value.trim().parse::<usize>() {
        Ok(len) if len > 0 => Ok(Some(len)),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "positive integer",
            value,
        }),
    }
}
