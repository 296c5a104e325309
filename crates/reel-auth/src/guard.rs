//! [`RouteGuard`]: gate for administrative views.

use std::sync::Arc;

use reel_core::principal::Principal;
use tokio::sync::watch;

use crate::{
  navigation::{AdminRoutes, Navigator},
  state::AuthState,
};

/// What a protected view should do for a given auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
  /// Show a loading indicator; do not navigate.
  Loading,
  /// Render the protected content.
  Render(Principal),
  /// Render nothing; the guard has navigated to this route.
  Redirect(String),
}

/// Pure mapping from state to decision.
pub fn decide(state: &AuthState, routes: &AdminRoutes) -> GuardDecision {
  match state {
    AuthState::Unknown | AuthState::Checking(_) => GuardDecision::Loading,
    AuthState::Authorized(p) => GuardDecision::Render(p.clone()),
    AuthState::Unauthorized(_) | AuthState::SignedOut => {
      GuardDecision::Redirect(routes.login.clone())
    }
  }
}

/// Follows an [`AuthState`] stream and re-evaluates on every change, so a
/// session that loses authorization mid-use loses the view immediately.
pub struct RouteGuard {
  states:    watch::Receiver<AuthState>,
  navigator: Arc<dyn Navigator>,
  routes:    AdminRoutes,
}

impl RouteGuard {
  pub fn new(
    states: watch::Receiver<AuthState>,
    navigator: Arc<dyn Navigator>,
    routes: AdminRoutes,
  ) -> Self {
    Self { states, navigator, routes }
  }

  /// Decide for the current state, navigating to the login surface if access
  /// is refused and the view is not already there.
  pub fn evaluate(&mut self) -> GuardDecision {
    let decision = decide(&self.states.borrow_and_update(), &self.routes);
    if let GuardDecision::Redirect(to) = &decision
      && self.navigator.current_route() != *to
    {
      self.navigator.navigate(to);
    }
    decision
  }

  /// Wait for the next state change and evaluate it. Returns `None` once the
  /// controller has gone away.
  pub async fn changed(&mut self) -> Option<GuardDecision> {
    self.states.changed().await.ok()?;
    Some(self.evaluate())
  }

  /// Wait until the state is terminal (anything but loading) and return that
  /// decision.
  pub async fn resolved(&mut self) -> Option<GuardDecision> {
    loop {
      let decision = self.evaluate();
      if decision != GuardDecision::Loading {
        return Some(decision);
      }
      self.states.changed().await.ok()?;
    }
  }
}
