//! Client configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! The binary loads an optional `.env` file first, then builds this config.
//! Command-line flags override individual values afterwards.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://family-cookbook-api.herokuapp.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DATA_DIR_NAME: &str = ".recipe-book";

/// Errors produced while building [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL '{0}': expected http:// or https://")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `RECIPE_API_BASE_URL`: default [`DEFAULT_API_BASE_URL`]
    /// - `RECIPE_DATA_DIR`: default `$HOME/.recipe-book`
    /// - `RECIPE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `RECIPE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. `from_env` delegates here.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = normalize_base_url(
            lookup("RECIPE_API_BASE_URL")
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;

        let data_dir = lookup("RECIPE_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_data_dir(lookup("HOME")), PathBuf::from);

        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("RECIPE_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("RECIPE_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_base_url, data_dir, timeouts })
    }

    /// Apply command-line overrides on top of the environment config.
    ///
    /// # Errors
    ///
    /// Returns an error if the overriding base URL is not an http(s) URL.
    pub fn with_overrides(mut self, base_url: Option<&str>, data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(url) = base_url {
            self.api_base_url = normalize_base_url(url)?;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidBaseUrl(raw.to_owned()))
    }
}

fn default_data_dir(home: Option<String>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(DATA_DIR_NAME),
        None => PathBuf::from(".").join(DATA_DIR_NAME),
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
