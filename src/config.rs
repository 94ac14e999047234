use std::env;

use anyhow::{Context, Result};
use tokio::time::Duration;

use crate::predictor::http::DEFAULT_BACKEND_URL;
use crate::session::coordinator::CoordinatorSettings;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so every
/// setting can live there instead of the shell environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the prediction service (TOXIGUARD_BACKEND_URL)
    pub backend_url: String,
    /// Real-time debounce delay in milliseconds (TOXIGUARD_DEBOUNCE_MS)
    pub debounce_ms: u64,
    /// Minimum trimmed length for a real-time call (TOXIGUARD_MIN_CHARS)
    pub min_chars: usize,
    /// Whether real-time analysis starts enabled (TOXIGUARD_REALTIME)
    pub realtime: bool,
    /// Per-request HTTP timeout in seconds (TOXIGUARD_TIMEOUT_SECS)
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            debounce_ms: 1200,
            min_chars: 5,
            realtime: true,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; a variable that is set but malformed is an
    /// error rather than silently ignored.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            backend_url: env::var("TOXIGUARD_BACKEND_URL").unwrap_or(defaults.backend_url),
            debounce_ms: parse_var("TOXIGUARD_DEBOUNCE_MS")?.unwrap_or(defaults.debounce_ms),
            min_chars: parse_var("TOXIGUARD_MIN_CHARS")?.unwrap_or(defaults.min_chars),
            realtime: match env::var("TOXIGUARD_REALTIME").ok() {
                Some(raw) => parse_bool(&raw)
                    .with_context(|| format!("TOXIGUARD_REALTIME has invalid value {raw:?}"))?,
                None => defaults.realtime,
            },
            timeout_secs: parse_var("TOXIGUARD_TIMEOUT_SECS")?.unwrap_or(defaults.timeout_secs),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings for the request coordinator.
    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            min_chars: self.min_chars,
            realtime: self.realtime,
        }
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has invalid value {raw:?}")),
        Err(_) => Ok(None),
    }
}

/// Accepts the usual spellings: true/false, 1/0, yes/no, on/off.
pub fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected true/false, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_spellings() {
        assert!(parse_bool("ON").unwrap());
        assert!(parse_bool(" yes ").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn default_settings_match_reference_behavior() {
        let settings = Config::default().coordinator_settings();
        assert_eq!(settings.debounce, Duration::from_millis(1200));
        assert_eq!(settings.min_chars, 5);
        assert!(settings.realtime);
    }
}
