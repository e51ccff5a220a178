//! Native probe configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.

use std::path::PathBuf;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
const DEFAULT_SESSION_FILE: &str = ".pageguard-session.json";

/// Configuration error types
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("PAGEGUARD_API_BASE must be an http(s) URL, got '{0}'")]
    InvalidApiBase(String),
}

/// Probe configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend origin the auth endpoints are resolved against
    /// Example: https://courses.example.com
    pub api_base: String,

    /// JSON file holding the session between probe runs
    pub session_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("PAGEGUARD_API_BASE").ok(),
            std::env::var("PAGEGUARD_SESSION_FILE").ok(),
        )
    }

    /// Build from raw values, applying defaults for missing ones
    pub fn from_vars(
        api_base: Option<String>,
        session_file: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_base = api_base
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidApiBase(api_base));
        }

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            session_file: session_file
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string())
                .into(),
        })
    }

    /// Absolute URL of an endpoint path
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}
