//! Failure classification for remote API calls.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Errors produced by [`super::RecipeApi`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The API rejected the username/password or token.
    #[error("credentials rejected: status 401")]
    Unauthorized,

    /// The API failed on its side (5xx).
    #[error("server error: status {status}")]
    Server { status: u16 },

    /// Any other non-success status.
    #[error("request failed: status {status}")]
    Status { status: u16 },

    /// The request never produced a response (connect, timeout, body read).
    #[error("API request failed: {0}")]
    Request(String),

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Parse(String),

    /// An auth response was missing its user id or token.
    #[error("auth response missing user id or token")]
    MalformedCredentials,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Classify a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            500..=599 => Self::Server { status },
            _ => Self::Status { status },
        }
    }

    /// Message suitable for showing next to a login/register form.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "There was a problem with your Username/Password!",
            Self::Server { .. } => "There was a problem with the server!",
            _ => "Something went wrong. Please try again.",
        }
    }
}
