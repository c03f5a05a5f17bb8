use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::generation::distribution::RatioPolicy;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub guide_path: PathBuf,
    pub program_data_path: PathBuf,
    /// Used when a generate request carries no key of its own.
    pub gemini_api_key: Option<String>,
    pub gemini_timeout: Duration,
    pub default_ratios: RatioPolicy,
    pub progress_tick: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_ratios = RatioPolicy {
            positive: parse_env("DEFAULT_POSITIVE_RATIO", 50u32)?,
            neutral: parse_env("DEFAULT_NEUTRAL_RATIO", 30u32)?,
            reduced: parse_env("DEFAULT_REDUCED_RATIO", 20u32)?,
        };
        default_ratios
            .check_bounds()
            .map_err(anyhow::Error::msg)
            .context("Invalid DEFAULT_*_RATIO")?;

        Ok(Config {
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            guide_path: std::env::var("GUIDE_PATH")
                .unwrap_or_else(|_| "emotion_guide.json".to_string())
                .into(),
            program_data_path: std::env::var("PROGRAM_DATA_PATH")
                .unwrap_or_else(|_| "program_data.json".to_string())
                .into(),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            gemini_timeout: Duration::from_secs(parse_env("GEMINI_TIMEOUT_SECS", 30u64)?),
            default_ratios,
            progress_tick: Duration::from_millis(parse_env("PROGRESS_TICK_MS", 1000u64)?),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u16 = parse_env("REACTIONS_TEST_SURELY_UNSET_VAR", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("REACTIONS_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("REACTIONS_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("REACTIONS_TEST_BAD_PORT");
    }
}
