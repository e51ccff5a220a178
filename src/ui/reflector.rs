//! Navbar reflection of the cached session
//!
//! Shows either the authenticated or the anonymous navbar fragment based on
//! the stored user snapshot. Reflection never affects authorization: a
//! malformed snapshot is logged and rendered as anonymous.

use crate::core::{Session, SessionStorage, User};

/// Reflection error types
#[derive(Debug, thiserror::Error)]
pub enum ReflectError {
    #[error("Stored user is malformed: {0}")]
    MalformedUser(#[from] serde_json::Error),
}

/// Write-only handle on the navbar elements
pub trait NavbarSink {
    fn set_authenticated_visible(&self, visible: bool);

    fn set_anonymous_visible(&self, visible: bool);

    fn set_username(&self, username: &str);

    /// Optional element; sinks without it ignore the call
    fn set_full_name(&self, full_name: &str);
}

/// Which fragment [`UiReflector::reflect`] made visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavbarState {
    Authenticated(User),
    Anonymous,
}

/// Reflects session state into an optional navbar
pub struct UiReflector<'a> {
    sink: Option<&'a dyn NavbarSink>,
}

impl<'a> UiReflector<'a> {
    pub fn new(sink: Option<&'a dyn NavbarSink>) -> Self {
        Self { sink }
    }

    pub fn has_navbar(&self) -> bool {
        self.sink.is_some()
    }

    /// Read the stored user and toggle the navbar fragments
    pub fn reflect<S: SessionStorage + ?Sized>(&self, storage: &S) -> NavbarState {
        let state = match read_user(storage) {
            Ok(Some(user)) => NavbarState::Authenticated(user),
            Ok(None) => NavbarState::Anonymous,
            Err(e) => {
                tracing::warn!("Failed to parse user data: {}", e);
                NavbarState::Anonymous
            }
        };

        let Some(sink) = self.sink else {
            return state;
        };

        match &state {
            NavbarState::Authenticated(user) => {
                self.write_identity(sink, user);
                sink.set_authenticated_visible(true);
                sink.set_anonymous_visible(false);
            }
            NavbarState::Anonymous => {
                sink.set_authenticated_visible(false);
                sink.set_anonymous_visible(true);
            }
        }
        state
    }

    /// Update the identity text after a successful verification
    pub fn show_identity(&self, user: &User) {
        if let Some(sink) = self.sink {
            self.write_identity(sink, user);
        }
    }

    fn write_identity(&self, sink: &dyn NavbarSink, user: &User) {
        sink.set_username(user.display_name());
        if let Some(full_name) = user.full_name() {
            sink.set_full_name(&full_name);
        }
    }
}

fn read_user<S: SessionStorage + ?Sized>(storage: &S) -> Result<Option<User>, ReflectError> {
    Ok(Session::new(storage).user()?)
}
