//! The navigation seam: where the admin UI currently is, and how to move it.

/// Implemented by whatever hosts the admin views (a browser router, a test
/// double).
pub trait Navigator: Send + Sync {
  fn current_route(&self) -> String;
  fn navigate(&self, to: &str);
}

/// Route layout of the admin surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRoutes {
  /// Every route at or under this prefix is administrative.
  pub prefix: String,
  /// The login surface. Lives under `prefix` but is never protected.
  pub login:  String,
  /// Where a successful sign-in lands.
  pub home:   String,
}

impl Default for AdminRoutes {
  fn default() -> Self {
    Self {
      prefix: "/admin".to_owned(),
      login:  "/admin/login".to_owned(),
      home:   "/admin".to_owned(),
    }
  }
}

impl AdminRoutes {
  /// Whether `route` requires an authorized session.
  pub fn is_protected(&self, route: &str) -> bool {
    let path = route.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    if path == self.login.trim_end_matches('/') {
      return false;
    }
    path == self.prefix || path.starts_with(&format!("{}/", self.prefix))
  }
}
