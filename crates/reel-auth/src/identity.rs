//! The identity provider boundary.
//!
//! OAuth mechanics live behind [`IdentityProvider`]; the rest of the crate
//! only sees principals arriving and leaving.

use std::{
  future::Future,
  sync::{Mutex, PoisonError},
};

use reel_core::principal::Principal;
use tokio::sync::mpsc;

use crate::error::ProviderError;

/// An external sign-in service.
pub trait IdentityProvider: Send + Sync {
  /// Run the interactive sign-in. Closing the popup yields
  /// [`ProviderError::Cancelled`].
  fn sign_in(&self) -> impl Future<Output = Result<Principal, ProviderError>> + Send + '_;

  fn sign_out(&self) -> impl Future<Output = Result<(), ProviderError>> + Send + '_;

  /// Session-change notifications, in the order the provider emits them.
  ///
  /// The current session (restored or `None`) is delivered first once the
  /// provider knows it.
  fn subscribe(&self) -> mpsc::UnboundedReceiver<Option<Principal>>;
}

/// Fan-out of session changes to any number of subscribers.
///
/// Providers embed one of these and call [`SessionFeed::publish`] whenever
/// their session is established, restored or cleared.
#[derive(Default)]
pub struct SessionFeed {
  inner: Mutex<FeedInner>,
}

#[derive(Default)]
struct FeedInner {
  /// `None` until the provider has resolved its initial session.
  current:     Option<Option<Principal>>,
  subscribers: Vec<mpsc::UnboundedSender<Option<Principal>>>,
}

impl SessionFeed {
  pub fn new() -> Self { Self::default() }

  pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Option<Principal>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(current) = &inner.current {
      let _ = tx.send(current.clone());
    }
    inner.subscribers.push(tx);
    rx
  }

  pub fn publish(&self, session: Option<Principal>) {
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.subscribers.retain(|tx| tx.send(session.clone()).is_ok());
    inner.current = Some(session);
  }

  /// The last published session, if any has been published.
  pub fn current(&self) -> Option<Option<Principal>> {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .current
      .clone()
  }
}
