//! Client-side route table.
//!
//! The application has a single page, so the table holds one entry: `/`,
//! named `todo`, showing the todo page. Matching is exact; there are no
//! parameters, wildcards or guards.

/// Page a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    TodoPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
}

const ROUTES: &[Route] = &[Route {
    path: "/",
    name: "todo",
    view: View::TodoPage,
}];

#[derive(Debug, Clone)]
pub struct Router {
    /// History base without a trailing slash; empty when mounted at `/`.
    base: String,
    routes: &'static [Route],
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_base("/")
    }

    /// Mount the route table under a history base such as `/app/`.
    pub fn with_base(base: &str) -> Self {
        let trimmed = base.trim().trim_matches('/');
        let base = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self {
            base,
            routes: ROUTES,
        }
    }

    pub fn routes(&self) -> &[Route] {
        self.routes
    }

    /// Route registered for `location`, if any. Query string and fragment
    /// are ignored.
    pub fn resolve(&self, location: &str) -> Option<&Route> {
        let end = location.find(['?', '#']).unwrap_or(location.len());
        let path = self.strip_base(&location[..end])?;
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Full location of a named route, base included.
    pub fn href(&self, name: &str) -> Option<String> {
        self.by_name(name)
            .map(|route| format!("{}{}", self.base, route.path))
    }

    fn strip_base<'a>(&self, location: &'a str) -> Option<&'a str> {
        if self.base.is_empty() {
            return Some(location);
        }
        match location.strip_prefix(self.base.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}
