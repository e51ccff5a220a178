//! Functions exported to the page
//!
//! `run_page_load` is scheduled by the wasm start hook; `logoutUser` and
//! `loginUser` are called from page scripts and forms.

use wasm_bindgen::prelude::*;

use super::{DomNavbar, FetchBackend, LocalStorage, LocationNavigator, NavbarSink};
use crate::app::{Navigator, PageGuard};
use crate::core::{Endpoints, MemoryStorage, SessionStorage, next_destination, sign_in};

/// `localStorage`, or an empty in-memory store when it is unavailable.
///
/// An empty store has no access token, so protected pages still redirect.
fn open_storage() -> Box<dyn SessionStorage> {
    match LocalStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            tracing::warn!("localStorage unavailable, using an empty session");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Classify the current location, reflect the navbar, guard protected pages
pub async fn run_page_load() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let path = match window.location().pathname() {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Failed to read location: {:?}", e);
            return;
        }
    };

    let storage = open_storage();
    let backend = FetchBackend::new(Endpoints::DEFAULT);
    let navbar = window.document().and_then(|doc| DomNavbar::find(&doc));

    let load = PageGuard::new(&*storage, &backend, &LocationNavigator)
        .with_navbar(navbar.as_ref().map(|n| n as &dyn NavbarSink))
        .on_page_load(&path)
        .await;
    tracing::debug!("Page load {}: {:?}", path, load);
}

/// Clear the session and go to the login page
#[wasm_bindgen(js_name = logoutUser)]
pub fn logout_user() {
    let storage = open_storage();
    let backend = FetchBackend::new(Endpoints::DEFAULT);
    PageGuard::new(&*storage, &backend, &LocationNavigator).logout();
}

/// Sign in and continue to the page named by `next`.
///
/// Resolves to `false` when the credentials were not accepted.
#[wasm_bindgen(js_name = loginUser)]
pub async fn login_user(username: String, password: String) -> bool {
    let storage = open_storage();
    match sign_in(&FetchBackend::new(Endpoints::DEFAULT), &*storage, &username, &password).await {
        Ok(_) => {
            let query = web_sys::window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            LocationNavigator.navigate(&next_destination(&query));
            true
        }
        Err(e) => {
            tracing::warn!("Sign in failed: {}", e);
            false
        }
    }
}
