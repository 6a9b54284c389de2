use std::collections::HashMap;

use super::KeyValueStorage;
use crate::error::StorageError;

/// Process-local storage. Nothing survives the process, which is exactly
/// what tests want.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, e.g. to simulate data left behind by an earlier run.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stand-in used when the real database cannot be opened. Every access fails,
/// so the store keeps working in memory and reports itself as degraded.
#[derive(Debug, Clone)]
pub struct DisabledStorage {
    reason: String,
}

impl DisabledStorage {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl KeyValueStorage for DisabledStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Disabled(self.reason.clone()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Disabled(self.reason.clone()))
    }
}
