//! Sign-in hand-off
//!
//! Exchanges credentials for a token pair and stores the resulting session,
//! so the guard finds it on the next protected page load.

use super::backend::{BackendError, LocalAuthBackend, LoginRequest};
use super::session::{Session, SessionStorage, StorageError, User};

/// Sign-in error types
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Failed to store session: {0}")]
    Storage(#[from] StorageError),
}

/// Log in with username and password and persist the issued session.
///
/// A rejected login leaves the stored session untouched. If the issued
/// session cannot be stored in full, whatever was written is cleared.
pub async fn sign_in<S, B>(
    backend: &B,
    storage: &S,
    username: &str,
    password: &str,
) -> Result<User, SignInError>
where
    S: SessionStorage + ?Sized,
    B: LocalAuthBackend,
{
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };
    let resp = backend.login(&request).await?;

    let session = Session::new(storage);
    if let Err(e) = session.establish(&resp.access, &resp.refresh, &resp.user) {
        if let Err(clear_err) = session.clear() {
            tracing::warn!("Failed to clear partial session: {}", clear_err);
        }
        return Err(e.into());
    }

    tracing::info!("Signed in as {}", resp.user.username);
    Ok(resp.user)
}
