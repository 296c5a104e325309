//! Error type for `reel-media`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unsupported media type: {0:?}")]
  UnsupportedType(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("image error: {0}")]
  Image(#[from] image::ImageError),

  #[error("could not compress below {max_bytes} bytes")]
  Budget { max_bytes: u64 },

  #[error("poster extraction failed: {0}")]
  Poster(String),

  #[error("upload cancelled")]
  Cancelled,

  #[error("upload task failed: {0}")]
  Task(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
