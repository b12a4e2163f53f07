//! Shared fakes for unit tests.

use std::cell::RefCell;

use tokio::sync::oneshot;

use crate::net::{ApiError, Credentials, Recipe, RecipeApi};

pub(crate) fn recipe(id: &str, title: &str) -> Recipe {
    Recipe { id: id.to_owned(), title: title.to_owned(), extra: serde_json::Map::new() }
}

/// Scripted [`RecipeApi`] that records every call.
pub(crate) struct FakeApi {
    pub auth_result: RefCell<Result<Credentials, ApiError>>,
    pub recipes_result: RefCell<Result<Vec<Recipe>, ApiError>>,
    /// `(path, username, password)` per auth call.
    pub auth_calls: RefCell<Vec<(&'static str, String, String)>>,
    /// `(user_id, token)` per recipe fetch.
    pub fetch_calls: RefCell<Vec<(String, String)>>,
    /// When set, the next fetch waits for this before answering.
    pub fetch_gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            auth_result: RefCell::new(Ok(Credentials::new("u1", Some("alice"), "t1"))),
            recipes_result: RefCell::new(Ok(vec![recipe("1", "Pancakes"), recipe("2", "Soup")])),
            auth_calls: RefCell::new(Vec::new()),
            fetch_calls: RefCell::new(Vec::new()),
            fetch_gate: RefCell::new(None),
        }
    }

    pub fn with_recipes(self, result: Result<Vec<Recipe>, ApiError>) -> Self {
        *self.recipes_result.borrow_mut() = result;
        self
    }

    pub fn with_auth(self, result: Result<Credentials, ApiError>) -> Self {
        *self.auth_result.borrow_mut() = result;
        self
    }

    /// Hold the next fetch until the returned sender fires (or is dropped).
    pub fn gate_next_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.fetch_gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.borrow().len()
    }
}

#[async_trait::async_trait(?Send)]
impl RecipeApi for FakeApi {
    async fn register(&self, username: &str, password: &str) -> Result<Credentials, ApiError> {
        self.auth_calls
            .borrow_mut()
            .push(("/auth/register", username.to_owned(), password.to_owned()));
        self.auth_result.borrow().clone()
    }

    async fn login(&self, username: &str, password: &str) -> Result<Credentials, ApiError> {
        self.auth_calls
            .borrow_mut()
            .push(("/auth/login", username.to_owned(), password.to_owned()));
        self.auth_result.borrow().clone()
    }

    async fn fetch_recipes(&self, user_id: &str, token: &str) -> Result<Vec<Recipe>, ApiError> {
        self.fetch_calls
            .borrow_mut()
            .push((user_id.to_owned(), token.to_owned()));
        // Answer with what was scripted at call time, even if held at the gate.
        let result = self.recipes_result.borrow().clone();
        let gate = self.fetch_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}
