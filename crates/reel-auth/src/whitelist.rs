//! Fail-closed whitelist authorization.

use std::sync::Arc;

use reel_core::{principal::Principal, whitelist::WhitelistStore};
use tracing::warn;

use crate::state::{Denial, DenialReason};

/// Answers "may this principal administer content".
///
/// Any store failure resolves to "no".
pub struct Whitelist<W> {
  store: Arc<W>,
}

impl<W> Clone for Whitelist<W> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<W: WhitelistStore> Whitelist<W> {
  pub fn new(store: Arc<W>) -> Self { Self { store } }

  /// `true` iff an entry keyed by exactly `email` exists and is active.
  pub async fn is_authorized(&self, email: &str) -> bool {
    match self.store.get_entry(email).await {
      Ok(Some(entry)) => entry.active,
      Ok(None) => false,
      Err(e) => {
        warn!(error = %e, email, "whitelist lookup failed; denying access");
        false
      }
    }
  }

  /// Check a principal, explaining any refusal.
  pub async fn verdict(&self, principal: &Principal) -> Result<(), Denial> {
    let deny = |reason| Denial {
      principal_id: principal.id.clone(),
      email:        principal.email.clone(),
      reason,
    };

    let Some(email) = principal.email() else {
      return Err(deny(DenialReason::MissingEmail));
    };
    if self.is_authorized(email).await {
      Ok(())
    } else {
      Err(deny(DenialReason::NotWhitelisted))
    }
  }
}
