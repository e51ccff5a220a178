//! Test doubles shared by the unit tests

use std::cell::{Cell, RefCell};

use super::backend::{
    BackendError, LocalAuthBackend, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
    VerifyResponse,
};
use super::session::User;

/// Scripted answer for one endpoint
#[derive(Debug, Clone)]
pub enum Reply {
    Ok,
    Status(u16),
    Offline,
    BadBody,
    /// Never resolves
    Hang,
}

impl Reply {
    fn error(&self) -> Option<BackendError> {
        match self {
            Reply::Ok | Reply::Hang => None,
            Reply::Status(status) => Some(BackendError::Rejected { status: *status }),
            Reply::Offline => Some(BackendError::Transport("connection refused".to_string())),
            Reply::BadBody => Some(BackendError::InvalidResponse("expected value".to_string())),
        }
    }
}

/// Backend answering from a script and counting calls
pub struct ScriptedBackend {
    pub verify: Reply,
    pub refresh: Reply,
    pub user: User,
    pub new_access: String,
    pub verify_calls: Cell<usize>,
    pub refresh_calls: Cell<usize>,
    pub last_bearer: RefCell<Option<String>>,
    pub last_refresh: RefCell<Option<RefreshRequest>>,
}

impl ScriptedBackend {
    pub fn new(verify: Reply, refresh: Reply) -> Self {
        Self {
            verify,
            refresh,
            user: User::new("alice").with_name("Alice", "Liddell"),
            new_access: "fresh-access".to_string(),
            verify_calls: Cell::new(0),
            refresh_calls: Cell::new(0),
            last_bearer: RefCell::new(None),
            last_refresh: RefCell::new(None),
        }
    }

    pub fn network_calls(&self) -> usize {
        self.verify_calls.get() + self.refresh_calls.get()
    }
}

impl LocalAuthBackend for ScriptedBackend {
    async fn verify(&self, access_token: &str) -> Result<VerifyResponse, BackendError> {
        self.verify_calls.set(self.verify_calls.get() + 1);
        *self.last_bearer.borrow_mut() = Some(access_token.to_string());
        if let Reply::Hang = self.verify {
            std::future::pending::<()>().await;
        }
        match self.verify.error() {
            Some(e) => Err(e),
            None => Ok(VerifyResponse {
                valid: Some(true),
                user: self.user.clone(),
            }),
        }
    }

    async fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, BackendError> {
        self.refresh_calls.set(self.refresh_calls.get() + 1);
        *self.last_refresh.borrow_mut() = Some(request.clone());
        if let Reply::Hang = self.refresh {
            std::future::pending::<()>().await;
        }
        match self.refresh.error() {
            Some(e) => Err(e),
            None => Ok(RefreshResponse {
                access: self.new_access.clone(),
            }),
        }
    }

    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        Err(BackendError::Rejected { status: 401 })
    }
}
