//! `window.localStorage` session storage

use crate::core::{SessionStorage, StorageError};

/// Session storage backed by the page's `localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Get localStorage for the current window
    ///
    /// Returns None if localStorage is not available (e.g. disabled by the user)
    pub fn open() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl SessionStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|_| StorageError::Unavailable)
    }
}
