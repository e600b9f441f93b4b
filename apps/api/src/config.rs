use std::fmt::Display;
use std::ops::RangeInclusive;

use anyhow::{Context, Result};

const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;
/// Up to one year.
const SESSION_TTL_HOURS_RANGE: RangeInclusive<i64> = 1..=24 * 365;
/// Up to thirty days.
const VERIFICATION_TTL_MINUTES_RANGE: RangeInclusive<i64> = 1..=60 * 24 * 30;

/// OAuth client credentials for one social provider.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Application configuration loaded from environment variables.
/// Only malformed or out-of-range values fail startup; every variable has a default or is optional.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent → the in-memory store is used.
    pub database_url: Option<String>,
    pub public_url: String,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_hours: i64,
    pub verification_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub secure_cookies: bool,
    pub anthropic_api_key: Option<String>,
    pub google: Option<OAuthCredentials>,
    pub github: Option<OAuthCredentials>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_ttl_hours: check_range(
                "SESSION_TTL_HOURS",
                parse_env("SESSION_TTL_HOURS", 168)?,
                SESSION_TTL_HOURS_RANGE,
            )?,
            verification_ttl_minutes: check_range(
                "VERIFICATION_TTL_MINUTES",
                parse_env("VERIFICATION_TTL_MINUTES", 24 * 60)?,
                VERIFICATION_TTL_MINUTES_RANGE,
            )?,
            bcrypt_cost: check_range(
                "BCRYPT_COST",
                parse_env("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
                BCRYPT_COST_RANGE,
            )?,
            secure_cookies: parse_env("SECURE_COOKIES", false)?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            google: oauth_credentials("GOOGLE"),
            github: oauth_credentials("GITHUB"),
        })
    }
}

/// Reads `KEY`, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn check_range<T>(key: &str, value: T, range: RangeInclusive<T>) -> Result<T>
where
    T: PartialOrd + Display,
{
    if !range.contains(&value) {
        anyhow::bail!(
            "Environment variable '{key}' must be between {} and {}, got {value}",
            range.start(),
            range.end()
        );
    }
    Ok(value)
}

/// Both `<PREFIX>_CLIENT_ID` and `<PREFIX>_CLIENT_SECRET` must be present to enable a provider.
fn oauth_credentials(prefix: &str) -> Option<OAuthCredentials> {
    let client_id = optional_env(&format!("{prefix}_CLIENT_ID"))?;
    let client_secret = optional_env(&format!("{prefix}_CLIENT_SECRET"))?;
    Some(OAuthCredentials {
        client_id,
        client_secret,
    })
}
