use thiserror::Error;

pub const MAX_PRODUCTS_PER_PAGE: u64 = 20;
pub const MAX_REVIEWS_PER_PAGE: u64 = 20;

/// Ceiling applied to the generic `limit` query parameter before it reaches the
/// per-endpoint ceilings above.
pub const MAX_LIST_LIMIT: u64 = 30;
pub const DEFAULT_LIST_LIMIT: u64 = 10;

/// Postgres takes `OFFSET` as a bigint.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_echo: bool,
    pub setup_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Config {
            database_url,
            bind_addr,
            db_echo: env_flag("DB_ECHO", true)?,
            setup_schema: env_flag("SETUP_SCHEMA", true)?,
        })
    }
}

fn env_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Clamps a requested page size to `ceiling`. Oversized requests are never rejected.
pub fn clamp_limit(limit: u64, ceiling: u64) -> u64 {
    limit.min(ceiling)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
