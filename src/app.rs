//! Page-load entry point
//!
//! Wires the route classifier, session guard and navbar reflector together
//! for one page load. All collaborators are passed in, so the flow runs the
//! same in the browser, natively, and in tests.

use crate::core::{
    AuthOutcome, Endpoints, LocalAuthBackend, RouteClass, RouteTable, Session, SessionGuard,
    SessionStorage, login_location,
};
use crate::ui::{NavbarSink, NavbarState, UiReflector};

/// Performs browser navigation
pub trait Navigator {
    fn navigate(&self, location: &str);
}

/// What happened during a page load
#[derive(Debug, Clone, PartialEq)]
pub struct PageLoad {
    pub route: RouteClass,
    /// `None` when the route is not protected and the guard did not run
    pub outcome: Option<AuthOutcome>,
    /// `None` when the page has no navbar
    pub navbar: Option<NavbarState>,
}

impl PageLoad {
    /// Whether the page may render
    pub fn is_allowed(&self) -> bool {
        self.outcome.as_ref().is_none_or(AuthOutcome::is_authorized)
    }
}

/// Route guard for a page and its collaborators
pub struct PageGuard<'a, S: SessionStorage + ?Sized, B> {
    storage: &'a S,
    backend: &'a B,
    navigator: &'a dyn Navigator,
    navbar: Option<&'a dyn NavbarSink>,
    routes: RouteTable,
    endpoints: Endpoints,
}

impl<'a, S, B> PageGuard<'a, S, B>
where
    S: SessionStorage + ?Sized,
    B: LocalAuthBackend,
{
    pub fn new(storage: &'a S, backend: &'a B, navigator: &'a dyn Navigator) -> Self {
        Self {
            storage,
            backend,
            navigator,
            navbar: None,
            routes: RouteTable::DEFAULT,
            endpoints: Endpoints::DEFAULT,
        }
    }

    pub fn with_navbar(mut self, navbar: Option<&'a dyn NavbarSink>) -> Self {
        self.navbar = navbar;
        self
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Classify `path`, reflect the navbar, and guard protected routes.
    ///
    /// A denied guard navigates to the login page before returning.
    pub async fn on_page_load(&self, path: &str) -> PageLoad {
        let route = self.routes.classify(path);
        let reflector = UiReflector::new(self.navbar);

        // Reflects the cached session; the guard may update it afterwards
        let navbar = reflector
            .has_navbar()
            .then(|| reflector.reflect(self.storage));

        let outcome = match route {
            RouteClass::Protected => {
                let guard = SessionGuard::new(self.storage, self.backend, self.endpoints.login_page);
                let outcome = guard.guard(path).await;
                match &outcome {
                    AuthOutcome::Authorized {
                        user: Some(user), ..
                    } => reflector.show_identity(user),
                    AuthOutcome::Authorized { user: None, .. } => {}
                    AuthOutcome::LoginRequired { location, .. } => {
                        self.navigator.navigate(location)
                    }
                }
                Some(outcome)
            }
            RouteClass::Public | RouteClass::Unclassified => None,
        };

        PageLoad {
            route,
            outcome,
            navbar,
        }
    }

    /// Clear the session and go to a clean login page
    pub fn logout(&self) {
        if let Err(e) = Session::new(self.storage).clear() {
            tracing::warn!("Session clear incomplete on logout: {}", e);
        }
        self.navigator
            .navigate(&login_location(self.endpoints.login_page, None));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::core::testing::{Reply, ScriptedBackend};
    use crate::core::{ACCESS_TOKEN_KEY, DenyReason, MemoryStorage, REFRESH_TOKEN_KEY, USER_KEY};

    #[derive(Default)]
    struct RecordingNavigator(RefCell<Vec<String>>);

    impl Navigator for RecordingNavigator {
        fn navigate(&self, location: &str) {
            self.0.borrow_mut().push(location.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingNavbar(RefCell<Vec<String>>);

    impl NavbarSink for RecordingNavbar {
        fn set_authenticated_visible(&self, visible: bool) {
            self.0.borrow_mut().push(format!("auth={}", visible));
        }
        fn set_anonymous_visible(&self, visible: bool) {
            self.0.borrow_mut().push(format!("anon={}", visible));
        }
        fn set_username(&self, username: &str) {
            self.0.borrow_mut().push(format!("username={}", username));
        }
        fn set_full_name(&self, full_name: &str) {
            self.0.borrow_mut().push(format!("full_name={}", full_name));
        }
    }

    const SPLIT: RouteTable = RouteTable::new(&["/auth/", "/app/public/"], &["/app/"]);

    fn logged_in() -> MemoryStorage {
        MemoryStorage::with_entries([
            (ACCESS_TOKEN_KEY, "access"),
            (REFRESH_TOKEN_KEY, "refresh"),
            (USER_KEY, r#"{"username":"cached"}"#),
        ])
    }

    #[tokio::test]
    async fn test_unclassified_route_never_guards() {
        let storage = MemoryStorage::new();
        let backend = ScriptedBackend::new(Reply::Status(401), Reply::Status(400));
        let navigator = RecordingNavigator::default();

        let load = PageGuard::new(&storage, &backend, &navigator)
            .with_routes(SPLIT)
            .on_page_load("/elsewhere")
            .await;

        assert_eq!(load.route, RouteClass::Unclassified);
        assert!(load.outcome.is_none());
        assert!(load.is_allowed());
        assert_eq!(backend.network_calls(), 0);
        assert!(navigator.0.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_public_route_wins_over_protected_prefix() {
        let storage = MemoryStorage::new();
        let backend = ScriptedBackend::new(Reply::Ok, Reply::Ok);
        let navigator = RecordingNavigator::default();

        let load = PageGuard::new(&storage, &backend, &navigator)
            .with_routes(SPLIT)
            .on_page_load("/app/public/terms")
            .await;

        assert_eq!(load.route, RouteClass::Public);
        assert!(load.outcome.is_none());
        assert_eq!(backend.network_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_token_navigates_to_login_with_next() {
        let storage = MemoryStorage::new();
        let backend = ScriptedBackend::new(Reply::Ok, Reply::Ok);
        let navigator = RecordingNavigator::default();

        let load = PageGuard::new(&storage, &backend, &navigator)
            .on_page_load("/courses/7/")
            .await;

        assert!(!load.is_allowed());
        assert!(matches!(
            load.outcome,
            Some(AuthOutcome::LoginRequired {
                reason: DenyReason::MissingAccessToken,
                ..
            })
        ));
        assert_eq!(
            *navigator.0.borrow(),
            vec!["/auth/login/?next=%2Fcourses%2F7%2F".to_string()]
        );
        assert_eq!(backend.network_calls(), 0);
    }

    #[tokio::test]
    async fn test_verified_page_reflects_cached_then_fresh_identity() {
        let storage = logged_in();
        let backend = ScriptedBackend::new(Reply::Ok, Reply::Ok);
        let navigator = RecordingNavigator::default();
        let navbar = RecordingNavbar::default();

        let load = PageGuard::new(&storage, &backend, &navigator)
            .with_navbar(Some(&navbar))
            .on_page_load("/profile/")
            .await;

        assert!(load.is_allowed());
        assert!(matches!(load.navbar, Some(NavbarState::Authenticated(ref u)) if u.username == "cached"));
        assert_eq!(
            *navbar.0.borrow(),
            vec![
                "username=cached".to_string(),
                "auth=true".to_string(),
                "anon=false".to_string(),
                "username=alice".to_string(),
                "full_name=Alice Liddell".to_string(),
            ]
        );
        assert!(navigator.0.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_navbar_reflected_on_public_pages() {
        let storage = MemoryStorage::new();
        let backend = ScriptedBackend::new(Reply::Ok, Reply::Ok);
        let navigator = RecordingNavigator::default();
        let navbar = RecordingNavbar::default();

        let load = PageGuard::new(&storage, &backend, &navigator)
            .with_navbar(Some(&navbar))
            .on_page_load("/auth/login/")
            .await;

        assert_eq!(load.navbar, Some(NavbarState::Anonymous));
        assert_eq!(
            *navbar.0.borrow(),
            vec!["auth=false".to_string(), "anon=true".to_string()]
        );
    }

    #[tokio::test]
    async fn test_refreshed_page_does_not_touch_identity() {
        let storage = logged_in();
        let backend = ScriptedBackend::new(Reply::Status(401), Reply::Ok);
        let navigator = RecordingNavigator::default();

        let load = PageGuard::new(&storage, &backend, &navigator)
            .on_page_load("/materials/")
            .await;

        assert_eq!(
            load.outcome,
            Some(AuthOutcome::Authorized {
                user: None,
                refreshed: true
            })
        );
        assert!(load.navbar.is_none());
        assert_eq!(storage.get(USER_KEY).as_deref(), Some(r#"{"username":"cached"}"#));
    }

    #[test]
    fn test_logout_clears_and_has_no_next() {
        for storage in [logged_in(), MemoryStorage::new()] {
            let backend = ScriptedBackend::new(Reply::Ok, Reply::Ok);
            let navigator = RecordingNavigator::default();

            PageGuard::new(&storage, &backend, &navigator).logout();

            assert!(storage.is_empty());
            assert_eq!(*navigator.0.borrow(), vec!["/auth/login/".to_string()]);
            assert_eq!(backend.network_calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_custom_login_page() {
        let storage = MemoryStorage::new();
        let backend = ScriptedBackend::new(Reply::Ok, Reply::Ok);
        let navigator = RecordingNavigator::default();

        PageGuard::new(&storage, &backend, &navigator)
            .with_endpoints(Endpoints {
                login_page: "/signin",
                ..Endpoints::DEFAULT
            })
            .on_page_load("/")
            .await;

        assert_eq!(*navigator.0.borrow(), vec!["/signin?next=%2F".to_string()]);
    }
}
