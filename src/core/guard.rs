//! Session guard
//!
//! Decides whether a protected page may render:
//! - No access token: force a login right away
//! - Verify the access token with the backend
//! - On any verify failure, attempt exactly one refresh
//! - Anything still unresolved forces a login (fail closed)

use super::backend::{LocalAuthBackend, RefreshRequest};
use super::redirect::login_location;
use super::session::{Session, SessionStorage, User};

/// Why the guard sent the user to the login page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingAccessToken,
    /// Verification failed and no refresh token was stored
    NoRefreshToken,
    /// Verification failed and the refresh attempt failed too
    RefreshFailed,
}

/// Result of a guard run
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The page may render.
    ///
    /// `user` is set when the backend verified the token. After a refresh
    /// the new token is trusted without another verification round-trip.
    Authorized { user: Option<User>, refreshed: bool },
    /// The session was cleared and the browser must go to `location`
    LoginRequired { location: String, reason: DenyReason },
}

impl AuthOutcome {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthOutcome::Authorized { .. })
    }

    /// Redirect target, if any
    pub fn redirect(&self) -> Option<&str> {
        match self {
            AuthOutcome::LoginRequired { location, .. } => Some(location),
            AuthOutcome::Authorized { .. } => None,
        }
    }
}

/// Token lifecycle for one page load
pub struct SessionGuard<'a, S: SessionStorage + ?Sized, B> {
    session: Session<'a, S>,
    backend: &'a B,
    login_page: &'a str,
}

impl<'a, S, B> SessionGuard<'a, S, B>
where
    S: SessionStorage + ?Sized,
    B: LocalAuthBackend,
{
    pub fn new(storage: &'a S, backend: &'a B, login_page: &'a str) -> Self {
        Self {
            session: Session::new(storage),
            backend,
            login_page,
        }
    }

    /// Run the guard for a protected `path`
    pub async fn guard(&self, path: &str) -> AuthOutcome {
        let Some(access_token) = self.session.access_token() else {
            tracing::debug!("No access token stored for {}", path);
            return self.force_login(path, DenyReason::MissingAccessToken);
        };

        // No timeout here: a hung verify leaves the page pending
        match self.backend.verify(&access_token).await {
            Ok(resp) => {
                if let Err(e) = self.session.set_user(&resp.user) {
                    tracing::warn!("Failed to store verified user: {}", e);
                }
                tracing::debug!("Access token verified for {}", resp.user.username);
                return AuthOutcome::Authorized {
                    user: Some(resp.user),
                    refreshed: false,
                };
            }
            Err(e) if e.is_rejection() => {
                tracing::debug!("Access token rejected: {}", e);
            }
            Err(e) => {
                tracing::warn!("Auth check failed: {}", e);
            }
        }

        if self.session.refresh_token().is_none() {
            return self.force_login(path, DenyReason::NoRefreshToken);
        }

        if self.try_refresh().await {
            AuthOutcome::Authorized {
                user: None,
                refreshed: true,
            }
        } else {
            self.force_login(path, DenyReason::RefreshFailed)
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Never fails: every error is logged and reported as `false`.
    pub async fn try_refresh(&self) -> bool {
        let Some(refresh_token) = self.session.refresh_token() else {
            return false;
        };

        let request = RefreshRequest { refresh_token };
        match self.backend.refresh(&request).await {
            Ok(resp) => match self.session.set_access_token(&resp.access) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to store refreshed access token: {}", e);
                    false
                }
            },
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                false
            }
        }
    }

    /// Clear the session and build the login redirect back to `path`
    pub fn force_login(&self, path: &str, reason: DenyReason) -> AuthOutcome {
        if let Err(e) = self.session.clear() {
            tracing::warn!("Session clear incomplete: {}", e);
        }
        let location = login_location(self.login_page, Some(path));
        tracing::info!("Redirecting to login ({:?}): {}", reason, location);
        AuthOutcome::LoginRequired { location, reason }
    }
}
