//! Route classification
//!
//! Maps a request path onto [`RouteClass`] using two static prefix tables.

/// Classification of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Listed as public, never guarded
    Public,
    /// Requires a verified session before rendering
    Protected,
    /// Not listed in either table, never guarded
    Unclassified,
}

/// Public and protected path-prefix tables.
///
/// Public entries take precedence over protected ones when both match.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    pub public: &'static [&'static str],
    pub protected: &'static [&'static str],
}

impl RouteTable {
    /// Routes of the deployed application
    pub const DEFAULT: RouteTable = RouteTable {
        public: &["/auth/login/", "/auth/register/", "/apihtml/", "/api-docs/"],
        protected: &[
            "/",
            "/courses/",
            "/enrollments/",
            "/profile/",
            "/courses/create/",
            "/materials/",
        ],
    };

    pub const fn new(public: &'static [&'static str], protected: &'static [&'static str]) -> Self {
        Self { public, protected }
    }

    /// Classify a path. Any query string or fragment is ignored.
    pub fn classify(&self, path: &str) -> RouteClass {
        let path = path_only(path);
        if matches_any(self.public, path) {
            RouteClass::Public
        } else if matches_any(self.protected, path) {
            RouteClass::Protected
        } else {
            RouteClass::Unclassified
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn path_only(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

fn matches_any(prefixes: &[&str], path: &str) -> bool {
    prefixes
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(prefix))
}
