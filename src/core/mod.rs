//! Token lifecycle and route gating

pub mod backend;
#[cfg(feature = "native")]
pub mod config;
pub mod guard;
pub mod login;
#[cfg(feature = "native")]
pub mod native;
pub mod redirect;
pub mod routes;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use backend::{
    AuthBackend, BackendError, Endpoints, LocalAuthBackend, LoginRequest, LoginResponse,
    RefreshRequest, RefreshResponse, VerifyResponse,
};
pub use guard::{AuthOutcome, DenyReason, SessionGuard};
pub use login::{SignInError, sign_in};
pub use redirect::{login_location, next_destination};
pub use routes::{RouteClass, RouteTable};
pub use session::{
    ACCESS_TOKEN_KEY, MemoryStorage, REFRESH_TOKEN_KEY, Session, SessionStorage, StorageError,
    USER_KEY, User,
};
