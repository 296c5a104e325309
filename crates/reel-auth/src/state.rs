//! The derived authorization state.

use reel_core::principal::Principal;

/// Why a signed-in principal was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
  /// The principal carries no email, so no whitelist entry can match.
  MissingEmail,
  /// No active whitelist entry, or the lookup failed.
  NotWhitelisted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
  pub principal_id: String,
  pub email:        Option<String>,
  pub reason:       DenialReason,
}

impl Denial {
  /// User-facing text.
  pub fn message(&self) -> &'static str {
    match self.reason {
      DenialReason::MissingEmail => "No email found in this account.",
      DenialReason::NotWhitelisted => {
        "Access denied. Your email is not authorized for this admin panel."
      }
    }
  }
}

/// Never persisted; recomputed from provider notifications and whitelist
/// lookups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
  /// No session notification has arrived yet.
  #[default]
  Unknown,
  /// A principal exists and its whitelist lookup is in flight.
  Checking(Principal),
  /// Only ever entered after a successful whitelist lookup.
  Authorized(Principal),
  Unauthorized(Denial),
  SignedOut,
}

impl AuthState {
  /// Whether the state is still waiting on the provider or the whitelist.
  pub fn is_pending(&self) -> bool {
    matches!(self, AuthState::Unknown | AuthState::Checking(_))
  }

  pub fn is_authorized(&self) -> bool { matches!(self, AuthState::Authorized(_)) }

  /// The principal currently holding (or being checked for) a session.
  pub fn principal(&self) -> Option<&Principal> {
    match self {
      AuthState::Checking(p) | AuthState::Authorized(p) => Some(p),
      _ => None,
    }
  }
}
