//! Durable key/value storage port.
//!
//! DESIGN
//! ======
//! The session layer never touches the filesystem directly. It talks to a
//! [`Storage`] implementation shaped like browser `localStorage`
//! (`get_item`/`set_item`/`remove_item` on string values), so tests can swap
//! in [`MemoryStorage`] and the binary can use [`FileStorage`].

mod file;
mod memory;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Keys become file names, so only a conservative character set is allowed.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage io failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// String key/value store that survives process restarts.
pub trait Storage {
    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}
