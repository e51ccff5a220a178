//! Native adapters
//!
//! `reqwest` client for the auth endpoints and a JSON-file session store,
//! used by the `pageguard` probe binary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::backend::{
    AuthBackend, BackendError, Endpoints, LoginRequest, LoginResponse, RefreshRequest,
    RefreshResponse, VerifyResponse,
};
use super::config::Config;
use super::session::{SessionStorage, StorageError};

/// Auth endpoints reached over HTTP with `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    config: Config,
    endpoints: Endpoints,
}

impl ReqwestBackend {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            endpoints: Endpoints::DEFAULT,
        }
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BackendError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

fn transport(e: reqwest::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

impl AuthBackend for ReqwestBackend {
    async fn verify(&self, access_token: &str) -> Result<VerifyResponse, BackendError> {
        let resp = self
            .client
            .get(self.config.endpoint_url(self.endpoints.verify))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(resp).await
    }

    async fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, BackendError> {
        let resp = self
            .client
            .post(self.config.endpoint_url(self.endpoints.refresh))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(resp).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let resp = self
            .client
            .post(self.config.endpoint_url(self.endpoints.login))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(resp).await
    }
}

/// Session stored as a flat JSON object in a file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    fn store(&self, key: &str, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |message: String| StorageError::Write {
            key: key.to_string(),
            message,
        };
        let json = serde_json::to_string_pretty(entries).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| write_err(e.to_string()))
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.store(key, &entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_all(&[key])
    }

    /// One read and one write, so a failed write leaves every key in place
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.load();
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() == before {
            return Ok(());
        }
        self.store(&keys.join(","), &entries)
    }
}
