use anyhow::{ensure, Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// Accepted range for `COMPLETION_MAX_ATTEMPTS`.
const MAX_COMPLETION_ATTEMPTS: u32 = 10;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub model_credential: String,
    pub model: String,
    pub completion_timeout_secs: u64,
    pub completion_max_attempts: u32,
    pub refresh_cron: String,
    pub refresh_enabled: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            model_credential: require_env("GENERATIVE_MODEL_CREDENTIAL")?,
            model: optional_env("GENERATIVE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            completion_timeout_secs: parse_env("COMPLETION_TIMEOUT_SECS", 60)?,
            completion_max_attempts: completion_attempts(parse_env("COMPLETION_MAX_ATTEMPTS", 3)?)?,
            // Every Sunday at midnight (sec min hour day-of-month month day-of-week)
            refresh_cron: optional_env("INSIGHT_REFRESH_CRON")
                .unwrap_or_else(|| "0 0 0 * * SUN".to_string()),
            refresh_enabled: parse_env("ENABLE_INSIGHT_REFRESH", true)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn completion_attempts(attempts: u32) -> Result<u32> {
    ensure!(
        (1..=MAX_COMPLETION_ATTEMPTS).contains(&attempts),
        "COMPLETION_MAX_ATTEMPTS must be between 1 and {MAX_COMPLETION_ATTEMPTS}, got {attempts}"
    );
    Ok(attempts)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("INSIGHTS_TEST_UNSET_TIMEOUT", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("INSIGHTS_TEST_ATTEMPTS", " 5 ");
        let value: u32 = parse_env("INSIGHTS_TEST_ATTEMPTS", 3).unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("INSIGHTS_TEST_ENABLED", "maybe");
        assert!(parse_env::<bool>("INSIGHTS_TEST_ENABLED", true).is_err());
    }

    #[test]
    fn test_completion_attempts_range() {
        assert_eq!(completion_attempts(1).unwrap(), 1);
        assert_eq!(completion_attempts(10).unwrap(), 10);
        assert!(completion_attempts(0).is_err());
        let err = completion_attempts(40).unwrap_err();
        assert!(err.to_string().contains("COMPLETION_MAX_ATTEMPTS"));
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("INSIGHTS_TEST_DEFINITELY_MISSING").unwrap_err();
        assert!(err.to_string().contains("INSIGHTS_TEST_DEFINITELY_MISSING"));
    }
}
