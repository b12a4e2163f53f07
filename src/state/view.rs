//! View models derived from session state.
//!
//! These are the rendering decisions the front end makes: whether the header
//! shows a sign-in link or a user badge, and whether the recipe area shows the
//! list or the empty-state message.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::fmt;

use super::session::SessionManager;
use crate::net::Recipe;
use crate::storage::Storage;

pub const SIGN_IN_LABEL: &str = "Sign In";
pub const EMPTY_MESSAGE: &str = "Wow!! Such Empty...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderBadge<'a> {
    SignIn,
    User { name: &'a str },
}

impl<'a> HeaderBadge<'a> {
    pub fn from_session<S: Storage>(session: &'a SessionManager<S>) -> Self {
        session
            .display_name()
            .map_or(Self::SignIn, |name| Self::User { name })
    }
}

impl fmt::Display for HeaderBadge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignIn => f.write_str(SIGN_IN_LABEL),
            Self::User { name } => write!(f, "Signed in as {name}"),
        }
    }
}

/// What the recipe area shows.
///
/// `NotLoaded` and `Empty` render the same message but stay distinct so a
/// loaded-but-empty collection is never mistaken for a missing one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecipeView<'a> {
    NotLoaded,
    Empty,
    Items(&'a [Recipe]),
}

impl<'a> RecipeView<'a> {
    #[must_use]
    pub fn from_recipes(recipes: Option<&'a [Recipe]>) -> Self {
        match recipes {
            None => Self::NotLoaded,
            Some([]) => Self::Empty,
            Some(items) => Self::Items(items),
        }
    }

    pub fn from_session<S: Storage>(session: &'a SessionManager<S>) -> Self {
        Self::from_recipes(session.recipes())
    }
}

impl fmt::Display for RecipeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded | Self::Empty => f.write_str(EMPTY_MESSAGE),
            Self::Items(items) => {
                for (i, recipe) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "[{}] {}", recipe.id, recipe.title)?;
                }
                Ok(())
            }
        }
    }
}
