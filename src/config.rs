// Configuration de l'application, lue depuis l'environnement (.env en local)

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_CRICKET_API_BASE_URL: &str = "https://api.cricapi.com/v1";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in .env file")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl_days: i64,
    pub session_cookie_secure: bool,
    pub password_hash_rounds: u32,
    pub reset_token_ttl_minutes: i64,
    pub cricket_api_base_url: String,
    pub cricket_api_key: String,
    pub sync_schema: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la config à partir d'une fonction de lecture des clés.
    /// Permet de tester le parsing sans toucher aux variables du processus.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let cricket_api_key = lookup("CRICKET_API_KEY").unwrap_or_default();
        if cricket_api_key.is_empty() {
            warn!("CRICKET_API_KEY is not set, upstream match data will be unavailable");
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            session_ttl_days: parse_or(&lookup, "SESSION_TTL_DAYS", 7)?,
            session_cookie_secure: parse_flag(&lookup, "SESSION_COOKIE_SECURE", true)?,
            password_hash_rounds: parse_or(&lookup, "PASSWORD_HASH_ROUNDS", 260_000)?,
            reset_token_ttl_minutes: parse_or(&lookup, "RESET_TOKEN_TTL_MINUTES", 60)?,
            cricket_api_base_url: lookup("CRICKET_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CRICKET_API_BASE_URL.to_string()),
            cricket_api_key,
            sync_schema: parse_flag(&lookup, "DATABASE_SYNC_SCHEMA", true)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}
