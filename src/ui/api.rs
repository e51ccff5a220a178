//! Browser `fetch` client for the auth endpoints

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::core::{
    BackendError, Endpoints, LocalAuthBackend, LoginRequest, LoginResponse, RefreshRequest,
    RefreshResponse, VerifyResponse,
};

/// Same-origin auth API reached with `gloo-net`
#[derive(Debug, Clone, Copy)]
pub struct FetchBackend {
    endpoints: Endpoints,
}

impl FetchBackend {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
    if !resp.ok() {
        return Err(BackendError::Rejected {
            status: resp.status(),
        });
    }
    resp.json::<T>()
        .await
        .map_err(|e| BackendError::InvalidResponse(e.to_string()))
}

fn transport(e: gloo_net::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

impl LocalAuthBackend for FetchBackend {
    async fn verify(&self, access_token: &str) -> Result<VerifyResponse, BackendError> {
        let resp = Request::get(self.endpoints.verify)
            .header("Authorization", &format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(transport)?;
        read_json(resp).await
    }

    async fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, BackendError> {
        let req = Request::post(self.endpoints.refresh)
            .header("Content-Type", "application/json")
            .json(request)
            .map_err(|e| BackendError::Request(e.to_string()))?;
        let resp = req.send().await.map_err(transport)?;
        read_json(resp).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let req = Request::post(self.endpoints.login)
            .header("Content-Type", "application/json")
            .json(request)
            .map_err(|e| BackendError::Request(e.to_string()))?;
        let resp = req.send().await.map_err(transport)?;
        read_json(resp).await
    }
}
