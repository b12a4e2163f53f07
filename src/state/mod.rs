//! Client-side session state.
//!
//! DESIGN
//! ======
//! `session` owns the authentication lifecycle and the recipe list tied to
//! it, `sync` turns session events into recipe fetches, and `view` derives
//! what the presentation layer should show.

pub mod session;
pub mod sync;
pub mod view;

pub use session::{FetchScope, RestoreOutcome, SessionEvent, SessionManager, SessionPhase, USER_DATA_KEY};
pub use sync::{LoginEdge, RecipeSync, SharedSession};
