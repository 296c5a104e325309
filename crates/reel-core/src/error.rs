//! Error types for `reel-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more required fields were absent or empty on create.
  #[error("missing required field(s): {}", .0.join(", "))]
  Validation(Vec<&'static str>),

  #[error("slug cannot be changed after creation")]
  SlugImmutable,

  #[error("slug already in use: {0}")]
  DuplicateSlug(String),

  #[error("project not found: {0}")]
  ProjectNotFound(String),

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::StoreUnavailable(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
