//! # Site Configuration
//!
//! Settings come from the process environment. [`SiteConfig::from_env`]
//! first loads `.env.{APP_ENV}` (default `development`) with `dotenvy`, so
//! a checked-in env file can supply the API base URL per environment.
//! Variables already set in the environment win over the file.
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `COMBOS_API_BASE_URL` | yes | JSON:API backend, e.g. `https://api.example.com/v1` |
//! | `COMBOS_API_TOKEN` | no | admin token sent as `X-Auth-Token` on writes |
//! | `COMBOS_PREFERENCES_PATH` | no | JSON file for persisted UI selections; in memory when unset |

use std::path::PathBuf;
use tracing::debug;

pub const APP_ENV: &str = "APP_ENV";
pub const API_BASE_URL: &str = "COMBOS_API_BASE_URL";
pub const API_TOKEN: &str = "COMBOS_API_TOKEN";
pub const PREFERENCES_PATH: &str = "COMBOS_PREFERENCES_PATH";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub preferences_path: Option<PathBuf>,
}

impl SiteConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_token: None,
            preferences_path: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let app_env = std::env::var(APP_ENV).unwrap_or_else(|_| "development".to_string());
        let env_file = format!(".env.{app_env}");
        match dotenvy::from_filename(&env_file) {
            Ok(path) => debug!(path = %path.display(), "Loaded env file"),
            Err(e) => debug!(file = %env_file, error = %e, "No env file loaded"),
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_base_url = non_empty(API_BASE_URL).ok_or(ConfigError::Missing(API_BASE_URL))?;
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: API_BASE_URL,
                reason: format!("expected an http(s) URL, got `{api_base_url}`"),
            });
        }

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_token: non_empty(API_TOKEN),
            preferences_path: non_empty(PREFERENCES_PATH).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn reads_all_settings() {
        let config = SiteConfig::from_lookup(lookup(&[
            (API_BASE_URL, "https://api.example.com/v1/"),
            (API_TOKEN, "secret"),
            (PREFERENCES_PATH, "/tmp/prefs.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.example.com/v1");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.preferences_path, Some(PathBuf::from("/tmp/prefs.json")));
    }

    #[test]
    fn base_url_is_required() {
        let result = SiteConfig::from_lookup(lookup(&[(API_TOKEN, "secret")]));

        assert_eq!(result, Err(ConfigError::Missing(API_BASE_URL)));
    }

    #[test]
    fn blank_token_is_none() {
        let config = SiteConfig::from_lookup(lookup(&[
            (API_BASE_URL, "http://localhost:8080"),
            (API_TOKEN, "  "),
        ]))
        .unwrap();

        assert_eq!(config, SiteConfig::new("http://localhost:8080"));
    }

    #[test]
    fn rejects_non_http_url() {
        let result = SiteConfig::from_lookup(lookup(&[(API_BASE_URL, "ftp://example.com")]));

        assert!(matches!(result, Err(ConfigError::Invalid { name: API_BASE_URL, .. })));
    }
}
