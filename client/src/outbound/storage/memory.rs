//! In-memory local storage.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::ports::{LocalStorage, LocalStorageError};

/// Storage that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    fn with_values<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, LocalStorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|_| LocalStorageError::io("memory storage lock poisoned"))?;
        Ok(f(&mut *guard))
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStorageError> {
        self.with_values(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        self.with_values(|values| {
            values.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), LocalStorageError> {
        self.with_values(|values| {
            values.remove(key);
        })
    }
}
