//! Durable key-value storage behind the room store. The store only ever needs
//! to read and overwrite a single entry, so the backends stay tiny: one backed
//! by the embedded SQLite database, one living purely in memory, and one that
//! refuses every access when no database could be opened.

mod connection;
mod memory;

pub use connection::SqliteStorage;
pub use memory::{DisabledStorage, MemoryStorage};

use std::path::Path;

use tracing::warn;

use crate::error::StorageError;

/// Minimal key-value contract the room store persists through.
pub trait KeyValueStorage {
    /// Fetch the value stored under `key`, or `None` if nothing was saved.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Prefer the on-disk database; if it cannot be opened, fall back to
/// [`DisabledStorage`] so the application keeps running in memory.
pub fn open_or_disable(path: &Path) -> Box<dyn KeyValueStorage> {
    match SqliteStorage::open(path) {
        Ok(storage) => Box::new(storage),
        Err(err) => {
            warn!(
                error = %err,
                path = %path.display(),
                "database unavailable, rooms will not persist across sessions"
            );
            Box::new(DisabledStorage::new(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn non_database_file_falls_back_to_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooms.sqlite");
        fs::write(&path, "this is not a sqlite database, just plain text padding").unwrap();

        let mut storage = open_or_disable(&path);
        assert!(matches!(storage.get("k"), Err(StorageError::Disabled(_))));
        assert!(storage.set("k", "v").is_err());
    }

    #[test]
    fn unwritable_parent_falls_back_to_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let storage = open_or_disable(&blocker.join("rooms.sqlite"));
        assert!(storage.get("k").is_err());
    }

    #[test]
    fn usable_path_opens_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = open_or_disable(&dir.path().join("rooms.sqlite"));
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
