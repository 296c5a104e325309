//! [`AuthController`]: the session and authorization state machine.
//!
//! ```text
//! Unknown ──session(p)──▶ Checking(p) ──allowed──▶ Authorized(p)
//!    │                        │
//!    │                        └──denied──▶ Unauthorized ──(forced sign-out)──▶ SignedOut
//!    └──session(none)──▶ SignedOut ──sign_in──▶ Checking
//! ```
//!
//! Every session change bumps a generation counter. A whitelist check only
//! applies its result if no newer session change has arrived in the meantime,
//! so the latest session always wins.

use std::sync::{Arc, Mutex, PoisonError};

use reel_core::{principal::Principal, whitelist::WhitelistStore};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
  error::ProviderError,
  identity::IdentityProvider,
  navigation::{AdminRoutes, Navigator},
  state::{AuthState, Denial},
  whitelist::Whitelist,
};

/// The result of an explicit [`AuthController::sign_in`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
  Authorized(Principal),
  /// Signed in with the provider but refused by the whitelist. The provider
  /// session has already been closed.
  Denied(Denial),
  /// The user dismissed the provider popup.
  Cancelled,
  /// The provider failed; the message is in [`AuthController::error`].
  Failed,
  /// A newer session change arrived while the whitelist check ran. Nothing
  /// was published, navigated or signed out.
  Superseded,
}

pub struct AuthController<P, W> {
  provider:   Arc<P>,
  whitelist:  Whitelist<W>,
  navigator:  Arc<dyn Navigator>,
  routes:     AdminRoutes,
  state:      watch::Sender<AuthState>,
  error:      watch::Sender<Option<String>>,
  /// Bumped on every session change; guards state writes.
  generation: Mutex<u64>,
}

impl<P, W> AuthController<P, W>
where
  P: IdentityProvider + 'static,
  W: WhitelistStore + 'static,
{
  pub fn new(
    provider: Arc<P>,
    whitelist: Arc<W>,
    navigator: Arc<dyn Navigator>,
    routes: AdminRoutes,
  ) -> Arc<Self> {
    Arc::new(Self {
      provider,
      whitelist: Whitelist::new(whitelist),
      navigator,
      routes,
      state: watch::Sender::new(AuthState::Unknown),
      error: watch::Sender::new(None),
      generation: Mutex::new(0),
    })
  }

  // ── Observation ───────────────────────────────────────────────────────────

  pub fn state(&self) -> AuthState { self.state.borrow().clone() }

  pub fn subscribe(&self) -> watch::Receiver<AuthState> { self.state.subscribe() }

  /// The user-visible error message, if any.
  pub fn error(&self) -> Option<String> { self.error.borrow().clone() }

  pub fn errors(&self) -> watch::Receiver<Option<String>> { self.error.subscribe() }

  pub fn routes(&self) -> &AdminRoutes { &self.routes }

  // ── Session changes ───────────────────────────────────────────────────────

  /// Subscribe to the provider and feed every notification through
  /// [`Self::on_session_change`]. Runs until the provider drops its sender.
  pub fn listen(self: &Arc<Self>) -> JoinHandle<()> {
    let mut sessions = self.provider.subscribe();
    let this = Arc::clone(self);
    tokio::spawn(async move {
      while let Some(session) = sessions.recv().await {
        this.on_session_change(session);
      }
      debug!("identity provider closed its session feed");
    })
  }

  /// Handle one session-change notification.
  ///
  /// Any check still in flight for an earlier notification is superseded.
  /// Returns the handle of the whitelist check started for a non-null
  /// session.
  pub fn on_session_change(self: &Arc<Self>, session: Option<Principal>) -> Option<JoinHandle<()>> {
    match session {
      None => {
        self.begin(AuthState::SignedOut);
        None
      }
      Some(principal) => {
        let generation = self.begin(AuthState::Checking(principal.clone()));
        let this = Arc::clone(self);
        Some(tokio::spawn(async move {
          this.resolve_session(generation, principal).await;
        }))
      }
    }
  }

  /// Re-validate the current session against the whitelist, e.g. after an
  /// entry may have been deactivated. Does nothing without a session.
  pub fn recheck(self: &Arc<Self>) -> Option<JoinHandle<()>> {
    let principal = self.state.borrow().principal().cloned()?;
    self.on_session_change(Some(principal))
  }

  async fn resolve_session(&self, generation: u64, principal: Principal) {
    let verdict = self.whitelist.verdict(&principal).await;

    match verdict {
      Ok(()) => {
        if self.apply(generation, AuthState::Authorized(principal.clone())) {
          info!(principal = %principal.id, "session authorized");
        }
      }
      Err(denial) => {
        if !self.apply(generation, AuthState::Unauthorized(denial)) {
          return;
        }
        warn!(principal = %principal.id, "session not authorized");
        let route = self.navigator.current_route();
        if self.routes.is_protected(&route) {
          if let Err(e) = self.provider.sign_out().await {
            warn!(error = %e, "forced sign-out failed");
          }
          self.navigator.navigate(&self.routes.login);
        }
      }
    }
  }

  // ── Explicit actions ──────────────────────────────────────────────────────

  /// Run the provider sign-in, then check the whitelist afresh.
  ///
  /// A refused principal is signed out of the provider straight away and the
  /// refusal is published as the user-visible error. If the session changes
  /// while the check runs, the result is dropped as [`SignInOutcome::Superseded`].
  pub async fn sign_in(&self) -> SignInOutcome {
    self.error.send_replace(None);

    let principal = match self.provider.sign_in().await {
      Ok(p) => p,
      Err(ProviderError::Cancelled) => {
        debug!("sign-in cancelled by user");
        return SignInOutcome::Cancelled;
      }
      Err(e) => {
        warn!(error = %e, "sign-in failed");
        self.error.send_replace(Some(format!("Failed to sign in: {e}")));
        return SignInOutcome::Failed;
      }
    };

    let generation = self.begin(AuthState::Checking(principal.clone()));

    match self.whitelist.verdict(&principal).await {
      Ok(()) => {
        if !self.apply(generation, AuthState::Authorized(principal.clone())) {
          return SignInOutcome::Superseded;
        }
        info!(principal = %principal.id, "signed in");
        self.navigator.navigate(&self.routes.home);
        SignInOutcome::Authorized(principal)
      }
      Err(denial) => {
        if !self.apply(generation, AuthState::Unauthorized(denial.clone())) {
          return SignInOutcome::Superseded;
        }
        self.error.send_replace(Some(denial.message().to_owned()));
        if let Err(e) = self.provider.sign_out().await {
          warn!(error = %e, "sign-out after refused sign-in failed");
        }
        SignInOutcome::Denied(denial)
      }
    }
  }

  /// Close the provider session and return to the login surface.
  pub async fn sign_out(&self) -> Result<(), ProviderError> {
    if let Err(e) = self.provider.sign_out().await {
      warn!(error = %e, "sign-out failed");
      self.error.send_replace(Some(format!("Failed to sign out: {e}")));
      return Err(e);
    }
    self.begin(AuthState::SignedOut);
    self.navigator.navigate(&self.routes.login);
    Ok(())
  }

  // ── State writes ──────────────────────────────────────────────────────────

  /// Start a new generation and publish its initial state.
  fn begin(&self, state: AuthState) -> u64 {
    let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
    *generation += 1;
    debug!(generation = *generation, ?state, "auth state");
    self.state.send_replace(state);
    *generation
  }

  /// Publish `state` only if `generation` is still the latest. Returns whether
  /// it was applied.
  fn apply(&self, generation: u64, state: AuthState) -> bool {
    let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
    if *current != generation {
      debug!(stale = generation, current = *current, "discarding superseded check");
      return false;
    }
    debug!(generation, ?state, "auth state");
    self.state.send_replace(state);
    true
  }
}
