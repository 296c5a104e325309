//! Whitelist entries and the storage trait that backs them.
//!
//! The whitelist is keyed by the email string exactly as stored. Entries are
//! never deleted by the application; revocation flips `active` to `false`.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistEntry {
  pub email:      String,
  /// Informational only; no permission checks read it.
  pub role:       String,
  pub active:     bool,
  pub added_date: DateTime<Utc>,
}

impl WhitelistEntry {
  pub fn admin(email: impl Into<String>) -> Self {
    Self {
      email:      email.into(),
      role:       "admin".to_owned(),
      active:     true,
      added_date: Utc::now(),
    }
  }
}

/// Storage for the authorization allow-list.
pub trait WhitelistStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up the entry keyed by `email`. Returns `None` if absent.
  fn get_entry<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<WhitelistEntry>, Self::Error>> + Send + 'a;

  /// Insert or replace the entry keyed by `entry.email`.
  fn put_entry(
    &self,
    entry: WhitelistEntry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set `active` on an existing entry. Returns `false` if no entry exists.
  fn set_active<'a>(
    &'a self,
    email: &'a str,
    active: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn list_entries(
    &self,
  ) -> impl Future<Output = Result<Vec<WhitelistEntry>, Self::Error>> + Send + '_;
}
