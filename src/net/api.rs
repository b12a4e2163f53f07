//! REST calls against the recipe API.
//!
//! DESIGN
//! ======
//! [`RecipeApi`] is the seam the session and form layers depend on; the
//! production [`HttpRecipeApi`] is a thin `reqwest` wrapper. Body parsing is
//! split into pure functions so it can be tested without a server.
//!
//! ERROR HANDLING
//! ==============
//! Non-success statuses are classified by [`ApiError::from_status`]. Nothing
//! here retries; callers decide what a failure means for the UI.

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use std::time::Duration;

use reqwest::header::AUTHORIZATION;

use super::error::ApiError;
use super::types::{AuthRequest, Credentials, Recipe};
use crate::config::{ClientConfig, Timeouts};

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const RECIPES_PATH: &str = "/recipes";

/// Operations the client needs from the remote API.
///
/// Futures are not `Send`: the client runs on a single cooperative thread.
#[async_trait::async_trait(?Send)]
pub trait RecipeApi {
    /// Create an account and return its session credentials.
    async fn register(&self, username: &str, password: &str) -> Result<Credentials, ApiError>;

    /// Exchange a username/password for session credentials.
    async fn login(&self, username: &str, password: &str) -> Result<Credentials, ApiError>;

    /// List the recipes visible to `user_id`, authenticated by `token`.
    async fn fetch_recipes(&self, user_id: &str, token: &str) -> Result<Vec<Recipe>, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpRecipeApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRecipeApi {
    /// Build a client for `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into() })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_base_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn authenticate(&self, path: &str, username: &str, password: &str) -> Result<Credentials, ApiError> {
        let response = self
            .http
            .post(endpoint(&self.base_url, path))
            .json(&AuthRequest { username, password })
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let text = read_success_body(response).await?;
        parse_credentials(&text)
    }
}

#[async_trait::async_trait(?Send)]
impl RecipeApi for HttpRecipeApi {
    async fn register(&self, username: &str, password: &str) -> Result<Credentials, ApiError> {
        self.authenticate(REGISTER_PATH, username, password).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<Credentials, ApiError> {
        self.authenticate(LOGIN_PATH, username, password).await
    }

    async fn fetch_recipes(&self, user_id: &str, token: &str) -> Result<Vec<Recipe>, ApiError> {
        let response = self
            .http
            .get(endpoint(&self.base_url, RECIPES_PATH))
            .query(&[("user_id", user_id)])
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let text = read_success_body(response).await?;
        parse_recipes(&text)
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::from_status(status.as_u16()));
    }
    response
        .text()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))
}

// =============================================================================
// PURE HELPERS
// =============================================================================

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub(crate) fn parse_credentials(text: &str) -> Result<Credentials, ApiError> {
    let credentials: Credentials = serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))?;
    if !credentials.is_complete() {
        return Err(ApiError::MalformedCredentials);
    }
    Ok(credentials)
}

pub(crate) fn parse_recipes(text: &str) -> Result<Vec<Recipe>, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}
