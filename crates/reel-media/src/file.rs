//! [`MediaFile`]: one file handed to the pipeline.

use bytes::Bytes;
use reel_core::project::MediaKind;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct MediaFile {
  /// Client-side file name; only used to build the object key.
  pub name:         String,
  /// MIME type as declared by the client.
  pub content_type: String,
  pub bytes:        Bytes,
}

impl MediaFile {
  pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
    Self {
      name:         name.into(),
      content_type: content_type.into(),
      bytes:        bytes.into(),
    }
  }

  /// Image or video; anything else is refused.
  pub fn kind(&self) -> Result<MediaKind> {
    MediaKind::from_content_type(&self.content_type)
      .ok_or_else(|| Error::UnsupportedType(self.content_type.clone()))
  }

  /// GIFs are never recompressed; it would drop their animation.
  pub fn is_gif(&self) -> bool {
    self
      .content_type
      .split(';')
      .next()
      .is_some_and(|t| t.trim().eq_ignore_ascii_case("image/gif"))
  }

  /// The file name with its extension replaced.
  pub fn name_with_extension(&self, ext: &str) -> String {
    let stem = match self.name.rsplit_once('.') {
      Some((stem, _)) if !stem.is_empty() => stem,
      _ => self.name.as_str(),
    };
    format!("{stem}.{ext}")
  }
}
