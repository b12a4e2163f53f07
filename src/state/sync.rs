//! Recipe loading driven by session events.
//!
//! DESIGN
//! ======
//! The fetch rule is level-triggered: [`LoginEdge`] watches the logged-in
//! level carried by every [`SessionEvent`] and yields a scope only when the
//! level rises from logged-out to logged-in. Which call produced the event
//! (login form, register form, startup restore) does not matter.
//!
//! Fetches run as `spawn_local` tasks on the current `LocalSet`, so they
//! interleave cooperatively with the rest of the client and never race it.
//! A finished fetch hands its result back through
//! [`SessionManager::apply_recipes`], which drops stale generations.

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::session::{FetchScope, SessionEvent, SessionManager};
use crate::net::RecipeApi;
use crate::storage::Storage;

/// Session manager shared between the UI and in-flight fetch tasks.
pub type SharedSession<S> = Rc<RefCell<SessionManager<S>>>;

/// Rising-edge detector over the logged-in level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoginEdge {
    logged_in: bool,
}

impl LoginEdge {
    /// Feed one event; returns the scope to fetch for on a logged-out to
    /// logged-in transition.
    pub fn observe(&mut self, event: &SessionEvent) -> Option<FetchScope> {
        let was_logged_in = self.logged_in;
        self.logged_in = event.is_logged_in();
        match event {
            SessionEvent::LoggedIn(scope) if !was_logged_in => Some(scope.clone()),
            _ => None,
        }
    }
}

/// Handle to the recipe fetches spawned for a session.
pub struct RecipeSync {
    pending: Rc<RefCell<Vec<JoinHandle<()>>>>,
}

impl RecipeSync {
    /// Subscribe to `session` and fetch recipes on every transition into the
    /// logged-in state.
    ///
    /// Install before [`SessionManager::restore_on_startup`] so the restored
    /// session is fetched too. Must be called from within a
    /// `tokio::task::LocalSet`.
    pub fn install<S, A>(session: &SharedSession<S>, api: Rc<A>) -> Self
    where
        S: Storage + 'static,
        A: RecipeApi + ?Sized + 'static,
    {
        let pending = Rc::new(RefCell::new(Vec::new()));
        let tasks = Rc::clone(&pending);
        let weak = Rc::downgrade(session);
        let mut edge = LoginEdge::default();

        session.borrow_mut().subscribe(move |event| {
            let Some(scope) = edge.observe(event) else {
                return;
            };
            debug!(user_id = %scope.user_id, generation = scope.generation, "fetching recipes");
            let handle = tokio::task::spawn_local(fetch_into(Weak::clone(&weak), Rc::clone(&api), scope));
            tasks.borrow_mut().push(handle);
        });

        Self { pending }
    }

    /// Number of fetch tasks that have not finished yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending
            .borrow()
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Wait until every spawned fetch, including ones spawned meanwhile, has
    /// finished.
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut *self.pending.borrow_mut());
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "recipe fetch task failed");
                }
            }
        }
    }
}

async fn fetch_into<S, A>(session: Weak<RefCell<SessionManager<S>>>, api: Rc<A>, scope: FetchScope)
where
    S: Storage,
    A: RecipeApi + ?Sized,
{
    let result = api.fetch_recipes(&scope.user_id, &scope.token).await;
    let Some(session) = session.upgrade() else {
        return;
    };
    session.borrow_mut().apply_recipes(scope.generation, result);
}
