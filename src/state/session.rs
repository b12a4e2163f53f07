//! Authentication session lifecycle.
//!
//! SYSTEM CONTEXT
//! ==============
//! The presentation layer calls [`SessionManager::login`] after a successful
//! login/register exchange, [`SessionManager::logout`] on sign-out, and
//! [`SessionManager::restore_on_startup`] once before any user input. It reads
//! the session fields and the recipe list to decide what to render.
//!
//! DESIGN
//! ======
//! `loggedIn` is not a separate flag: the session is `Some` exactly when the
//! user is logged in, and a session is only ever stored with a non-empty user
//! id and token. Every login/logout call emits a [`SessionEvent`] to
//! subscribers; deciding whether that event warrants a recipe fetch is the
//! subscriber's job (see `state::sync`).
//!
//! Each transition into `LoggedIn` gets a fresh generation number. Recipe
//! responses carry the generation they were requested under and are dropped
//! if the session has moved on, so a response that lands after logout never
//! repopulates the list.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use tracing::{debug, error, info, warn};

use crate::net::{ApiError, Credentials, Recipe};
use crate::storage::Storage;

/// Storage key of the durable session record.
pub const USER_DATA_KEY: &str = "user-data";

/// Display name used when a logged-in user has no name.
pub const ANONYMOUS_NAME: &str = "Anonymous";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    LoggedOut,
    LoggedIn,
}

/// Identity a recipe fetch is scoped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchScope {
    pub generation: u64,
    pub user_id: String,
    pub token: String,
}

/// Emitted after every `login`/`logout` call with the resulting state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(FetchScope),
    LoggedOut { generation: u64 },
}

impl SessionEvent {
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }
}

/// Result of [`SessionManager::restore_on_startup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    NoRecord,
    /// The record could not be parsed or was missing its id/token.
    Corrupt,
    /// The storage backend could not be read.
    Unavailable,
    /// Restore already ran for this manager.
    AlreadyRestored,
}

type Observer = Box<dyn FnMut(&SessionEvent)>;

pub struct SessionManager<S> {
    storage: S,
    session: Option<Credentials>,
    recipes: Option<Vec<Recipe>>,
    fetch_error: Option<ApiError>,
    generation: u64,
    restored: bool,
    observers: Vec<Observer>,
}

impl<S: Storage> SessionManager<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: None,
            recipes: None,
            fetch_error: None,
            generation: 0,
            restored: false,
            observers: Vec::new(),
        }
    }

    /// Register a callback for every session event.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Enter the logged-in state with `credentials`, optionally writing the
    /// durable record.
    ///
    /// Logging in again as the same identity only refreshes the stored
    /// fields. Logging in as a different identity ends the current session
    /// first, so observers see `LoggedOut` followed by `LoggedIn`.
    pub fn login(&mut self, credentials: Credentials, persist: bool) {
        if !credentials.is_complete() {
            warn!("ignoring login with missing user id or token");
            return;
        }

        let same_identity = self
            .session
            .as_ref()
            .is_some_and(|current| current.user_id == credentials.user_id && current.token == credentials.token);

        if self.session.is_some() && !same_identity {
            info!("switching identity; ending previous session");
            self.end_session();
        }

        if persist {
            self.persist(&credentials);
        }

        if !same_identity {
            self.generation += 1;
            info!(user_id = %credentials.user_id, generation = self.generation, "session started");
        }
        self.session = Some(credentials);
        self.emit_current();
    }

    /// Drop the durable record and all in-memory session state.
    ///
    /// Safe to call while logged out; the storage key is removed regardless.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove_item(USER_DATA_KEY) {
            error!(error = %e, "failed to remove stored session");
        }
        if self.session.is_some() {
            info!("session ended");
            self.end_session();
        } else {
            self.emit_current();
        }
    }

    /// Rehydrate the session from storage. Only the first call has any effect.
    ///
    /// The record is never rewritten here; an unreadable or corrupt record
    /// leaves the manager logged out.
    pub fn restore_on_startup(&mut self) -> RestoreOutcome {
        if self.restored {
            warn!("session restore requested more than once");
            return RestoreOutcome::AlreadyRestored;
        }
        self.restored = true;

        let raw = match self.storage.get_item(USER_DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no stored session");
                return RestoreOutcome::NoRecord;
            }
            Err(e) => {
                warn!(error = %e, "stored session unreadable; starting logged out");
                return RestoreOutcome::Unavailable;
            }
        };

        let credentials = match serde_json::from_str::<Credentials>(&raw) {
            Ok(credentials) if credentials.is_complete() => credentials,
            Ok(_) => {
                warn!("stored session missing user id or token; starting logged out");
                return RestoreOutcome::Corrupt;
            }
            Err(e) => {
                warn!(error = %e, "stored session corrupt; starting logged out");
                return RestoreOutcome::Corrupt;
            }
        };

        info!(user_id = %credentials.user_id, "restoring stored session");
        self.login(credentials, false);
        RestoreOutcome::Restored
    }

    /// Deliver the result of a recipe fetch requested under `generation`.
    ///
    /// Returns `false` when the response is stale (logged out, or a newer
    /// session started) and was discarded.
    pub fn apply_recipes(&mut self, generation: u64, result: Result<Vec<Recipe>, ApiError>) -> bool {
        if self.session.is_none() || generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale recipe response");
            return false;
        }
        match result {
            Ok(recipes) => {
                debug!(count = recipes.len(), "recipes loaded");
                self.recipes = Some(recipes);
                self.fetch_error = None;
            }
            Err(e) => {
                warn!(error = %e, "recipe fetch failed");
                self.fetch_error = Some(e);
            }
        }
        true
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_logged_in() { SessionPhase::LoggedIn } else { SessionPhase::LoggedOut }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }

    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.username.as_deref())
    }

    /// The user's name, or [`ANONYMOUS_NAME`] when logged in without one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| match s.username.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => ANONYMOUS_NAME,
        })
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// `None` until a fetch for the current session succeeds.
    #[must_use]
    pub fn recipes(&self) -> Option<&[Recipe]> {
        self.recipes.as_deref()
    }

    /// Error from the latest failed fetch of the current session.
    #[must_use]
    pub fn fetch_error(&self) -> Option<&ApiError> {
        self.fetch_error.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn persist(&mut self, credentials: &Credentials) {
        let raw = match serde_json::to_string(credentials) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "failed to encode session");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(USER_DATA_KEY, &raw) {
            error!(error = %e, "failed to persist session");
        }
    }

    fn end_session(&mut self) {
        self.session = None;
        self.recipes = None;
        self.fetch_error = None;
        self.generation += 1;
        self.emit_current();
    }

    fn emit_current(&mut self) {
        let event = match &self.session {
            Some(session) => SessionEvent::LoggedIn(FetchScope {
                generation: self.generation,
                user_id: session.user_id.clone(),
                token: session.token.clone(),
            }),
            None => SessionEvent::LoggedOut { generation: self.generation },
        };
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}
