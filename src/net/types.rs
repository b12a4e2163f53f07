//! Wire DTOs for the recipe API.
//!
//! DESIGN
//! ======
//! The API hands out numeric ids in some deployments and string ids in
//! others. Both are accepted and kept as opaque strings so the session layer
//! never has to care.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Identity returned by `/auth/login` and `/auth/register`.
///
/// The same shape is persisted as the durable session record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Opaque user identifier.
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub user_id: String,
    /// Display name; may be absent.
    #[serde(default)]
    pub username: Option<String>,
    /// Opaque credential sent with recipe requests.
    pub token: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, username: Option<&str>, token: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), username: username.map(str::to_owned), token: token.into() }
    }

    /// Both the user id and token are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.token.trim().is_empty()
    }
}

/// Body of `/auth/login` and `/auth/register`.
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// A recipe as listed by `GET /recipes`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Every other field the API returns (ingredients, category, source...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn deserialize_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(number) if number.is_i64() || number.is_u64() => Ok(number.to_string()),
        serde_json::Value::Number(_) => Err(D::Error::custom("expected integer id")),
        _ => Err(D::Error::custom("expected string or integer id")),
    }
}
