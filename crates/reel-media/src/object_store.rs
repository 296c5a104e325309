//! Object storage for uploaded media.
//!
//! Keys are content-addressed: `{folder}/{digest}-{name}`, where `digest` is
//! a SHA-256 prefix of the stored bytes. Re-uploading the same bytes under the
//! same name yields the same URL.

use std::{
  future::Future,
  path::{Path, PathBuf},
};

use bytes::Bytes;
use sha2::{Digest, Sha256};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::{Error, Result, progress::Progress};

const CHUNK_SIZE: usize = 64 * 1024;
const DIGEST_CHARS: usize = 16;

/// Somewhere to put bytes that hands back a public URL.
pub trait ObjectStore: Send + Sync {
  /// Store `body` under `key`, reporting progress as bytes are written, and
  /// return the object's URL.
  fn put<'a>(
    &'a self,
    key: &'a str,
    body: Bytes,
    content_type: &'a str,
    progress: &'a Progress,
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

/// Build the object key for `body` stored under `folder` as `name`.
pub fn object_key(folder: &str, name: &str, body: &[u8]) -> String {
  let digest = hex::encode(Sha256::digest(body));
  let name = sanitize(name);
  let name = if name.is_empty() { "file".to_owned() } else { name };

  let folder = folder
    .split('/')
    .map(sanitize)
    .filter(|segment| !segment.is_empty() && segment.chars().any(|c| c != '.'))
    .collect::<Vec<_>>()
    .join("/");

  let file = format!("{}-{name}", &digest[..DIGEST_CHARS]);
  if folder.is_empty() { file } else { format!("{folder}/{file}") }
}

fn sanitize(part: &str) -> String {
  part
    .trim()
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '-' })
    .collect()
}

// ─── Filesystem store ────────────────────────────────────────────────────────

/// Writes objects under a root directory; URLs are `{base_url}/{key}`.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
  root:     PathBuf,
  base_url: String,
}

impl FsObjectStore {
  pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_owned();
    Self { root: root.into(), base_url }
  }

  pub fn root(&self) -> &Path { &self.root }

  pub fn url_for(&self, key: &str) -> String { format!("{}/{key}", self.base_url) }
}

impl ObjectStore for FsObjectStore {
  async fn put<'a>(
    &'a self,
    key: &'a str,
    body: Bytes,
    content_type: &'a str,
    progress: &'a Progress,
  ) -> Result<String> {
    let path = self.root.join(key);
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }

    // Written to a uniquely named file beside the target and renamed, so
    // readers never see a partial object. The temp file is removed if the
    // write fails or the future is dropped.
    let (file, partial) = staging_file(&path).await?;
    let mut file = tokio::fs::File::from_std(file);
    let total = body.len();
    let mut written = 0;
    progress.report_bytes(0, total);
    for chunk in body.chunks(CHUNK_SIZE) {
      file.write_all(chunk).await?;
      written += chunk.len();
      progress.report_bytes(written, total);
    }
    file.sync_all().await?;
    drop(file);
    tokio::task::spawn_blocking(move || partial.persist(&path))
      .await
      .map_err(|e| Error::Task(e.to_string()))?
      .map_err(|e| Error::Io(e.error))?;
    progress.report(1.0);

    tracing::debug!(key, content_type, bytes = total, "stored object");
    Ok(self.url_for(key))
  }
}

/// Create an empty `*.part` file in the directory of `target`.
async fn staging_file(target: &Path) -> Result<(std::fs::File, TempPath)> {
  let dir = target.parent().map(Path::to_path_buf).unwrap_or_default();
  let file = tokio::task::spawn_blocking(move || {
    tempfile::Builder::new().prefix(".").suffix(".part").tempfile_in(dir)
  })
  .await
  .map_err(|e| Error::Task(e.to_string()))??;
  Ok(file.into_parts())
}
