//! Persisted session state
//!
//! The session lives in client-side key/value storage under three string keys.
//! Storage is abstracted behind [`SessionStorage`] so the browser's
//! `localStorage`, a JSON file, or an in-memory map can back it.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Storage key for the short-lived bearer credential
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the long-lived refresh credential
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Storage key for the JSON-encoded user snapshot
pub const USER_KEY: &str = "user";

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage is not available")]
    Unavailable,

    #[error("Failed to write '{key}': {message}")]
    Write { key: String, message: String },
}

/// String key/value store holding the session
pub trait SessionStorage {
    /// Read a value, `None` when the key is absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove several keys, all or nothing.
    ///
    /// The default removes one key at a time and puts earlier values back
    /// when a later removal fails. Stores that can write once override it.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut removed: Vec<(&str, String)> = Vec::with_capacity(keys.len());
        for key in keys {
            let previous = self.get(key);
            if let Err(e) = self.remove(key) {
                for (key, value) in removed.into_iter().rev() {
                    if let Err(e) = self.set(key, &value) {
                        tracing::warn!("Failed to restore session key '{}': {}", key, e);
                    }
                }
                return Err(e);
            }
            if let Some(value) = previous {
                removed.push((*key, value));
            }
        }
        Ok(())
    }
}

impl<T: SessionStorage + ?Sized> SessionStorage for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_all(keys)
    }
}

/// Last-known identity snapshot returned by the backend.
///
/// Display only; never used for authorization decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self.last_name = Some(last_name.to_string());
        self
    }

    /// Name shown in the navbar, falls back to `User` for an empty username
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            "User"
        } else {
            &self.username
        }
    }

    /// `"first last"` when a first name is known
    pub fn full_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().filter(|s| !s.is_empty())?;
        let last = self.last_name.as_deref().unwrap_or_default();
        Some(format!("{} {}", first, last).trim().to_string())
    }
}

/// Typed view over the three session keys of a [`SessionStorage`]
pub struct Session<'a, S: SessionStorage + ?Sized> {
    storage: &'a S,
}

impl<'a, S: SessionStorage + ?Sized> Session<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Stored access token; an empty value counts as absent
    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored refresh token; an empty value counts as absent
    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Raw JSON of the stored user snapshot
    pub fn user_json(&self) -> Option<String> {
        self.storage.get(USER_KEY)
    }

    /// Decode the stored user snapshot.
    ///
    /// `Ok(None)` when absent, `Err` when the persisted value is malformed.
    pub fn user(&self) -> Result<Option<User>, serde_json::Error> {
        match self.user_json() {
            Some(raw) => serde_json::from_str(&raw).map(Some),
            None => Ok(None),
        }
    }

    pub fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, token)
    }

    pub fn set_user(&self, user: &User) -> Result<(), StorageError> {
        let json = serde_json::to_string(user).map_err(|e| StorageError::Write {
            key: USER_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.storage.set(USER_KEY, &json)
    }

    /// Store a complete session issued by a login
    pub fn establish(&self, access: &str, refresh: &str, user: &User) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, access)?;
        self.storage.set(REFRESH_TOKEN_KEY, refresh)?;
        self.set_user(user)
    }

    /// Remove all three session keys together.
    ///
    /// On failure the stored session is left whole, never partially cleared.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage
            .remove_all(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY])
    }
}

/// In-memory storage, used by tests and as a scratch store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'k>(entries: impl IntoIterator<Item = (&'k str, &'k str)>) -> Self {
        let storage = Self::new();
        for (key, value) in entries {
            storage
                .entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }
        storage
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.entries.borrow_mut();
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}
