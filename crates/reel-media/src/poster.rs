//! Poster-frame extraction for uploaded videos.

use std::{future::Future, path::PathBuf, process::Stdio};

use bytes::Bytes;
use tokio::process::Command;

use crate::{Error, Result};

/// Produces a still JPEG frame from video bytes.
pub trait PosterExtractor: Send + Sync {
  fn extract(&self, video: Bytes) -> impl Future<Output = Result<Bytes>> + Send + '_;
}

/// Shells out to `ffmpeg` and grabs one frame near the start of the clip.
#[derive(Debug, Clone)]
pub struct FfmpegPoster {
  program:    PathBuf,
  at_seconds: f64,
}

impl Default for FfmpegPoster {
  fn default() -> Self {
    Self { program: PathBuf::from("ffmpeg"), at_seconds: 0.1 }
  }
}

impl FfmpegPoster {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self { program: program.into(), ..Self::default() }
  }

  pub fn at_seconds(mut self, at_seconds: f64) -> Self {
    self.at_seconds = at_seconds;
    self
  }
}

impl PosterExtractor for FfmpegPoster {
  async fn extract(&self, video: Bytes) -> Result<Bytes> {
    // ffmpeg needs to seek, so the input goes through a file rather than stdin.
    let input = tempfile::NamedTempFile::new()?;
    tokio::fs::write(input.path(), &video).await?;

    let output = Command::new(&self.program)
      .args(["-hide_banner", "-loglevel", "error", "-ss"])
      .arg(self.at_seconds.to_string())
      .arg("-i")
      .arg(input.path())
      .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "mjpeg", "pipe:1"])
      .stdin(Stdio::null())
      .kill_on_drop(true)
      .output()
      .await
      .map_err(|e| Error::Poster(format!("failed to run {}: {e}", self.program.display())))?;

    if !output.status.success() || output.stdout.is_empty() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(Error::Poster(format!("{} exited with {}: {}", self.program.display(), output.status, stderr.trim())));
    }
    Ok(Bytes::from(output.stdout))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn missing_binary_is_an_error() {
    let poster = FfmpegPoster::new("/nonexistent/ffmpeg-binary");
    let err = poster.extract(Bytes::from_static(b"\0\0\0\x18ftypmp42")).await.unwrap_err();
    assert!(matches!(err, Error::Poster(_)));
  }
}
