//! Principal: a signed-in identity as reported by the identity provider.

use serde::{Deserialize, Serialize};

/// An authenticated identity. Never persisted by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
  /// Provider-assigned opaque identifier.
  pub id:           String,
  /// Absent for some providers; a principal without an email is never
  /// authorized.
  pub email:        Option<String>,
  pub display_name: Option<String>,
  pub avatar_url:   Option<String>,
}

impl Principal {
  pub fn new(id: impl Into<String>, email: Option<&str>) -> Self {
    Self {
      id:           id.into(),
      email:        email.map(str::to_owned),
      display_name: None,
      avatar_url:   None,
    }
  }

  /// The email, treating an empty string the same as an absent one.
  pub fn email(&self) -> Option<&str> {
    self.email.as_deref().filter(|e| !e.is_empty())
  }
}
