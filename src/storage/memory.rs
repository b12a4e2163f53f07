use std::collections::HashMap;

use super::{Storage, StorageError};

/// In-memory storage that also counts mutations, so tests can assert which
/// operations touched durable state.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    writes: usize,
    removes: usize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write.
    #[must_use]
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Number of `set_item` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Number of `remove_item` calls so far.
    #[must_use]
    pub fn remove_count(&self) -> usize {
        self.removes
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes += 1;
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.removes += 1;
        self.items.remove(key);
        Ok(())
    }
}
