//! Errors surfaced by the identity provider boundary.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
  /// The user closed the sign-in popup. Not a failure.
  #[error("sign-in cancelled")]
  Cancelled,

  /// Network or provider-side failure; recoverable.
  #[error("{0}")]
  Provider(String),
}
