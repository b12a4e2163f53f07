//! Networking modules for the remote recipe API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines wire DTOs, `error` classifies failures, and `api` performs
//! the HTTP calls behind the [`api::RecipeApi`] seam.

pub mod api;
pub mod error;
pub mod types;

pub use api::{HttpRecipeApi, RecipeApi};
pub use error::ApiError;
pub use types::{Credentials, Recipe};
