//! The upload pipeline and the task handles it returns.

use std::sync::Arc;

use reel_core::project::MediaKind;
use tokio::{
  sync::watch,
  task::{JoinHandle, JoinSet},
};

use crate::{
  Error, MediaFile, Result,
  compress::{CompressionOptions, compress},
  object_store::{ObjectStore, object_key},
  poster::PosterExtractor,
  progress::Progress,
};

/// Outcome of one stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
  pub url:          String,
  pub kind:         MediaKind,
  /// MIME type of the bytes actually stored.
  pub content_type: String,
  pub size:         usize,
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

/// A running upload.
///
/// Progress is observable at any time; [`UploadTask::cancel`] aborts the
/// transfer and makes [`UploadTask::finish`] return [`Error::Cancelled`].
pub struct UploadTask<T> {
  progress: watch::Receiver<f64>,
  handle:   JoinHandle<Result<T>>,
  poster:   Option<PosterTask>,
}

impl<T> UploadTask<T> {
  /// Overall fraction in `[0, 1]`.
  pub fn progress(&self) -> watch::Receiver<f64> { self.progress.clone() }

  pub fn cancel(&self) { self.handle.abort(); }

  pub async fn finish(self) -> Result<T> {
    match self.handle.await {
      Ok(result) => result,
      Err(e) if e.is_cancelled() => Err(Error::Cancelled),
      Err(e) => Err(Error::Task(e.to_string())),
    }
  }

  /// The poster extraction running beside a video upload. It is independent
  /// of the upload: cancelling one leaves the other alone.
  pub fn take_poster(&mut self) -> Option<PosterTask> { self.poster.take() }
}

/// Background poster extraction. Failures are logged, never surfaced.
pub struct PosterTask {
  handle: JoinHandle<Option<String>>,
}

impl PosterTask {
  pub async fn url(self) -> Option<String> { self.handle.await.ok().flatten() }

  pub fn cancel(&self) { self.handle.abort(); }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

pub struct MediaPipeline<O, X> {
  store:         Arc<O>,
  poster:        Option<Arc<X>>,
  options:       CompressionOptions,
  batch_options: CompressionOptions,
}

impl<O, X> Clone for MediaPipeline<O, X> {
  fn clone(&self) -> Self {
    Self {
      store:         self.store.clone(),
      poster:        self.poster.clone(),
      options:       self.options,
      batch_options: self.batch_options,
    }
  }
}

impl<O, X> MediaPipeline<O, X>
where
  O: ObjectStore + 'static,
  X: PosterExtractor + 'static,
{
  pub fn new(store: O) -> Self {
    Self {
      store:         Arc::new(store),
      poster:        None,
      options:       CompressionOptions::default(),
      batch_options: CompressionOptions::gallery(),
    }
  }

  pub fn with_poster(mut self, poster: X) -> Self {
    self.poster = Some(Arc::new(poster));
    self
  }

  pub fn with_options(mut self, single: CompressionOptions, batch: CompressionOptions) -> Self {
    self.options = single;
    self.batch_options = batch;
    self
  }

  pub fn store(&self) -> &O { &self.store }

  /// Start uploading one file into `folder`.
  ///
  /// Unsupported types are refused before anything is spawned. Videos also
  /// start a [`PosterTask`] when a poster extractor is configured.
  pub fn upload(&self, file: MediaFile, folder: &str) -> Result<UploadTask<UploadedMedia>> {
    let kind = file.kind()?;
    let (mut handles, progress) = Progress::tracker(1);
    let slot = handles.remove(0);

    let poster = match (&self.poster, kind) {
      (Some(extractor), MediaKind::Video) => Some(self.spawn_poster(extractor.clone(), &file, folder)),
      _ => None,
    };

    let store = self.store.clone();
    let options = self.options;
    let folder = folder.to_owned();
    let handle = tokio::spawn(async move { ingest(&*store, file, kind, &folder, options, &slot).await });

    Ok(UploadTask { progress, handle, poster })
  }

  /// Upload several files into `folder` concurrently.
  ///
  /// The result keeps input order regardless of completion order and
  /// progress is the mean across files. The first failure aborts the rest.
  pub fn upload_batch(&self, files: Vec<MediaFile>, folder: &str) -> Result<UploadTask<Vec<UploadedMedia>>> {
    let kinds = files.iter().map(MediaFile::kind).collect::<Result<Vec<_>>>()?;
    let (slots, progress) = Progress::tracker(files.len());

    let mut set = JoinSet::new();
    for (index, ((file, kind), slot)) in files.into_iter().zip(kinds).zip(slots).enumerate() {
      let store = self.store.clone();
      let options = self.batch_options;
      let folder = folder.to_owned();
      set.spawn(async move { (index, ingest(&*store, file, kind, &folder, options, &slot).await) });
    }

    // Dropping the set aborts whatever is still running, so cancelling the
    // outer task cancels every transfer.
    let handle = tokio::spawn(async move {
      let mut done: Vec<Option<UploadedMedia>> = vec![None; set.len()];
      while let Some(joined) = set.join_next().await {
        let (index, result) = joined.map_err(|e| Error::Task(e.to_string()))?;
        done[index] = Some(result?);
      }
      Ok(done.into_iter().flatten().collect())
    });

    Ok(UploadTask { progress, handle, poster: None })
  }

  fn spawn_poster(&self, extractor: Arc<X>, file: &MediaFile, folder: &str) -> PosterTask {
    let store = self.store.clone();
    let video = file.bytes.clone();
    let name = format!("poster-{}", file.name_with_extension("jpg"));
    let folder = folder.to_owned();

    let handle = tokio::spawn(async move {
      let frame = match extractor.extract(video).await {
        Ok(frame) => frame,
        Err(e) => {
          tracing::warn!(error = %e, "poster extraction failed");
          return None;
        }
      };
      let key = object_key(&folder, &name, &frame);
      match store.put(&key, frame, "image/jpeg", &Progress::detached()).await {
        Ok(url) => Some(url),
        Err(e) => {
          tracing::warn!(error = %e, key = %key, "storing poster failed");
          None
        }
      }
    });
    PosterTask { handle }
  }
}

async fn ingest<O: ObjectStore>(
  store: &O,
  file: MediaFile,
  kind: MediaKind,
  folder: &str,
  options: CompressionOptions,
  progress: &Progress,
) -> Result<UploadedMedia> {
  let mut name = file.name.clone();
  let mut content_type = file.content_type.clone();
  let mut body = file.bytes.clone();

  if kind == MediaKind::Image && !file.is_gif() {
    match compress(file.bytes.clone(), options).await {
      Ok(compressed) => {
        tracing::debug!(name = %file.name, before = file.bytes.len(), after = compressed.len(), "compressed image");
        name = file.name_with_extension("jpg");
        content_type = "image/jpeg".to_owned();
        body = compressed;
      }
      Err(e) => {
        tracing::warn!(name = %file.name, error = %e, "compression failed; uploading original");
      }
    }
  }

  let key = object_key(folder, &name, &body);
  let size = body.len();
  let url = store.put(&key, body, &content_type, progress).await?;
  tracing::info!(key = %key, kind = ?kind, size, "uploaded media");

  Ok(UploadedMedia { url, kind, content_type, size })
}
