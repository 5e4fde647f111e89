use std::path::PathBuf;
use std::time::Duration;

use crate::db::migrations;
use crate::error::{AppError, AppResult};
use crate::inference::{DEFAULT_BASE_URL, DEFAULT_MODELS};

pub const DEFAULT_MAX_QUERY_CHARS: usize = 4000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Runtime settings, resolved from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bearer token for the inference endpoint (`HFTOKEN`)
    pub token: Option<String>,
    pub base_url: String,
    /// Candidate models in preference order
    pub models: Vec<String>,
    pub db_path: PathBuf,
    /// Queries longer than this are rejected before any request is made
    pub max_query_chars: usize,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            db_path: migrations::get_db_path(),
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Read settings from the process environment. A `.env` file in the
    /// working directory is loaded first if present.
    pub fn from_env() -> AppResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut settings = Self::default();
        settings.token = get("HFTOKEN");

        if let Some(url) = get("LAWPILOT_BASE_URL") {
            settings.base_url = url;
        }
        if let Some(models) = get("LAWPILOT_MODELS") {
            let models: Vec<String> = models
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
            if models.is_empty() {
                return Err(AppError::Config("LAWPILOT_MODELS lists no models".into()));
            }
            settings.models = models;
        }
        if let Some(path) = get("LAWPILOT_DB_PATH") {
            settings.db_path = PathBuf::from(path);
        }
        if let Some(raw) = get("LAWPILOT_MAX_QUERY_CHARS") {
            settings.max_query_chars = parse_positive("LAWPILOT_MAX_QUERY_CHARS", &raw)?;
        }
        if let Some(raw) = get("LAWPILOT_TIMEOUT_SECS") {
            let secs = parse_positive("LAWPILOT_TIMEOUT_SECS", &raw)?;
            settings.request_timeout = Duration::from_secs(secs as u64);
        }

        Ok(settings)
    }

    pub fn require_token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Config("HFTOKEN is not set".into()))
    }
}

fn parse_positive(key: &str, raw: &str) -> AppResult<usize> {
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(AppError::Config(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
        Ok(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> AppResult<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert!(settings.token.is_none());
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.models, DEFAULT_MODELS.to_vec());
        assert_eq!(settings.max_query_chars, DEFAULT_MAX_QUERY_CHARS);
        assert_eq!(settings.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(settings.db_path.ends_with(".lawpilot/chat_history.db"));
        assert!(matches!(settings.require_token(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("HFTOKEN", " hf_abc "),
            ("LAWPILOT_BASE_URL", "http://localhost:8080/v1"),
            ("LAWPILOT_MODELS", "a/one, b/two ,,"),
            ("LAWPILOT_DB_PATH", "/tmp/x.db"),
            ("LAWPILOT_MAX_QUERY_CHARS", "50"),
            ("LAWPILOT_TIMEOUT_SECS", "7"),
        ])
        .unwrap();

        assert_eq!(settings.require_token().unwrap(), "hf_abc");
        assert_eq!(settings.base_url, "http://localhost:8080/v1");
        assert_eq!(settings.models, vec!["a/one", "b/two"]);
        assert_eq!(settings.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(settings.max_query_chars, 50);
        assert_eq!(settings.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_blank_token_is_missing() {
        let settings = settings_from(&[("HFTOKEN", "   ")]).unwrap();
        assert!(settings.token.is_none());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        for (key, value) in [
            ("LAWPILOT_MAX_QUERY_CHARS", "lots"),
            ("LAWPILOT_MAX_QUERY_CHARS", "0"),
            ("LAWPILOT_TIMEOUT_SECS", "-3"),
        ] {
            let err = settings_from(&[(key, value)]).unwrap_err();
            assert!(matches!(err, AppError::Config(ref msg) if msg.contains(key)), "{err}");
        }
    }

    #[test]
    fn test_empty_model_list_rejected() {
        let err = settings_from(&[("LAWPILOT_MODELS", " , ,")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
