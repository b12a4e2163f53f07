//! # recipe-book
//!
//! Client for the family recipe-book API. Owns the signed-in session, keeps a
//! durable copy of it between runs, and loads the user's recipe collection
//! whenever a session becomes active.
//!
//! The crate is split the same way a browser front end would be: `net` talks
//! to the remote API, `storage` stands in for browser local storage, `state`
//! holds the session lifecycle and derived views, and `forms` validates and
//! submits the login/register input.

pub mod config;
pub mod forms;
pub mod net;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
