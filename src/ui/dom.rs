//! DOM adapters: navbar elements and `window.location`

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::reflector::NavbarSink;
use crate::app::Navigator;

const AUTHENTICATED_SECTION_ID: &str = "jwt-user-section";
const ANONYMOUS_SECTION_ID: &str = "login-section";
const USERNAME_ID: &str = "current-username";
const FULL_NAME_ID: &str = "current-user-fullname";

/// Navbar elements found in the current document
pub struct DomNavbar {
    authenticated: Option<HtmlElement>,
    anonymous: Option<HtmlElement>,
    username: Option<HtmlElement>,
    full_name: Option<HtmlElement>,
}

impl DomNavbar {
    /// Look up the navbar; `None` when neither section container exists
    pub fn find(document: &Document) -> Option<Self> {
        let navbar = Self {
            authenticated: element(document, AUTHENTICATED_SECTION_ID),
            anonymous: element(document, ANONYMOUS_SECTION_ID),
            username: element(document, USERNAME_ID),
            full_name: element(document, FULL_NAME_ID),
        };
        (navbar.authenticated.is_some() || navbar.anonymous.is_some()).then_some(navbar)
    }
}

fn element(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn set_display(el: &Option<HtmlElement>, visible: bool) {
    if let Some(el) = el {
        let value = if visible { "block" } else { "none" };
        if let Err(e) = el.style().set_property("display", value) {
            tracing::error!("Failed to set display on #{}: {:?}", el.id(), e);
        }
    }
}

impl NavbarSink for DomNavbar {
    fn set_authenticated_visible(&self, visible: bool) {
        set_display(&self.authenticated, visible);
    }

    fn set_anonymous_visible(&self, visible: bool) {
        set_display(&self.anonymous, visible);
    }

    fn set_username(&self, username: &str) {
        if let Some(el) = &self.username {
            el.set_text_content(Some(username));
        }
    }

    fn set_full_name(&self, full_name: &str) {
        if let Some(el) = &self.full_name {
            el.set_text_content(Some(full_name));
        }
    }
}

/// Navigates by assigning `window.location.href`
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, location: &str) {
        let result = web_sys::window()
            .ok_or("No window")
            .and_then(|w| w.location().set_href(location).map_err(|_| "set_href failed"));
        if let Err(e) = result {
            tracing::error!("Navigation to {} failed: {}", location, e);
        }
    }
}
