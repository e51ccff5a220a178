//! Navbar reflection and browser adapters

pub mod reflector;

#[cfg(feature = "browser")]
pub mod api;
#[cfg(feature = "browser")]
pub mod console;
#[cfg(feature = "browser")]
pub mod dom;
#[cfg(feature = "browser")]
pub mod entry;
#[cfg(feature = "browser")]
pub mod storage;

pub use reflector::{NavbarSink, NavbarState, ReflectError, UiReflector};

#[cfg(feature = "browser")]
pub use api::FetchBackend;
#[cfg(feature = "browser")]
pub use dom::{DomNavbar, LocationNavigator};
#[cfg(feature = "browser")]
pub use storage::LocalStorage;
