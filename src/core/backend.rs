//! Backend auth API contract
//!
//! The verify, refresh and login endpoints are external services. This module
//! describes their request/response bodies and the trait adapters implement
//! to reach them (`gloo-net` in the browser, `reqwest` natively).

use serde::{Deserialize, Serialize};

use super::session::User;

/// Backend error types
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success status
    #[error("Request rejected with status {status}")]
    Rejected { status: u16 },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Success status but the body could not be used
    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    #[error("Failed to build request: {0}")]
    Request(String),
}

impl BackendError {
    /// Whether the backend itself refused the credential
    pub fn is_rejection(&self) -> bool {
        matches!(self, BackendError::Rejected { .. })
    }
}

/// Endpoint paths, relative to the backend origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub verify: &'static str,
    pub refresh: &'static str,
    pub login: &'static str,
    /// Login page the browser is sent to
    pub login_page: &'static str,
}

impl Endpoints {
    pub const DEFAULT: Endpoints = Endpoints {
        verify: "/api/v1/auth/verify",
        refresh: "/api/v1/auth/refresh",
        login: "/api/v1/auth/login",
        login_page: "/auth/login/",
    };
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Verify endpoint success body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyResponse {
    #[serde(default)]
    pub valid: Option<bool>,
    pub user: User,
}

/// Refresh request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh endpoint success body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshResponse {
    pub access: String,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login endpoint success body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Client for the backend auth endpoints.
///
/// `LocalAuthBackend` futures need not be `Send`, which the browser `fetch`
/// bindings require. `AuthBackend` is the `Send` variant used natively;
/// every `AuthBackend` is also a `LocalAuthBackend`.
#[trait_variant::make(AuthBackend: Send)]
pub trait LocalAuthBackend {
    /// `GET` verify with the access token as bearer credential
    async fn verify(&self, access_token: &str) -> Result<VerifyResponse, BackendError>;

    /// `POST` the refresh token, returning a new access token
    async fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, BackendError>;

    /// `POST` credentials, returning a full token pair
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError>;
}
