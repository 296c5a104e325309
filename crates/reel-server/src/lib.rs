//! Server assembly for Reel: configuration, the application router and the
//! static-build export.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use reel_core::{repository::ContentRepository, store::ContentStore};
use reel_media::{FfmpegPoster, FsObjectStore, MediaPipeline};
use serde::Deserialize;
use tower_http::services::ServeDir;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, read from `config.toml` and `REEL_*` variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Directory uploaded media is written to and served from.
  pub media_root:     PathBuf,
  /// Public prefix for media URLs; `/media` when served by this process.
  pub media_base_url: String,
  /// `ffmpeg` used for video poster frames. Posters are skipped when unset.
  #[serde(default)]
  pub ffmpeg:         Option<PathBuf>,
}

/// Layer `file` (optional) under `REEL_*` environment variables on top of
/// the built-in defaults. `~` in paths is expanded.
pub fn load_config(file: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 3000)?
    .set_default("store_path", "reel.db")?
    .set_default("media_root", "media")?
    .set_default("media_base_url", "http://localhost:3000/media")?
    .add_source(config::File::from(file).required(false))
    .add_source(config::Environment::with_prefix("REEL"))
    .build()
    .context("failed to read config file")?;

  let mut cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  cfg.store_path = expand_tilde(&cfg.store_path);
  cfg.media_root = expand_tilde(&cfg.media_root);
  cfg.ffmpeg = cfg.ffmpeg.as_deref().map(expand_tilde);
  Ok(cfg)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

pub fn media_pipeline(cfg: &ServerConfig) -> MediaPipeline<FsObjectStore, FfmpegPoster> {
  let pipeline = MediaPipeline::new(FsObjectStore::new(&cfg.media_root, &cfg.media_base_url));
  match &cfg.ffmpeg {
    Some(program) => pipeline.with_poster(FfmpegPoster::new(program)),
    None => pipeline,
  }
}

/// The API plus `/media` served from `media_root`.
pub fn app<S: ContentStore + 'static>(cfg: &ServerConfig, store: Arc<S>) -> Router {
  reel_api::api_router(ContentRepository::new(store), media_pipeline(cfg))
    .nest_service("/media", ServeDir::new(&cfg.media_root))
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// Write every project, newest first, to `out` as pretty JSON. Returns the
/// number written.
pub async fn export_projects<S: ContentStore>(store: Arc<S>, out: &Path) -> anyhow::Result<usize> {
  let projects = ContentRepository::new(store)
    .list_projects()
    .await
    .context("failed to list projects")?;
  let json = serde_json::to_vec_pretty(&projects)?;
  tokio::fs::write(out, json)
    .await
    .with_context(|| format!("failed to write {}", out.display()))?;
  Ok(projects.len())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use reel_core::project::NewProject;
  use reel_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  fn config_in(dir: &Path) -> ServerConfig {
    ServerConfig {
      host:           "127.0.0.1".to_owned(),
      port:           0,
      store_path:     dir.join("reel.db"),
      media_root:     dir.join("media"),
      media_base_url: "/media".to_owned(),
      ffmpeg:         None,
    }
  }

  #[test]
  fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "port = 8080\nmedia_root = \"/srv/media\"\n").unwrap();

    let cfg = load_config(&file).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.media_root, PathBuf::from("/srv/media"));
    assert_eq!(cfg.media_base_url, "http://localhost:3000/media");
    assert!(cfg.ffmpeg.is_none());
  }

  #[test]
  fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("reel.db"));
  }

  #[test]
  fn tilde_expansion() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/reel.db")), PathBuf::from(home).join("reel.db"));
    assert_eq!(expand_tilde(Path::new("/abs/reel.db")), PathBuf::from("/abs/reel.db"));
  }

  #[tokio::test]
  async fn serves_uploaded_media() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(dir.path());
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let router = app(&cfg, store);

    let upload = Request::builder()
      .method("POST")
      .uri("/uploadMedia?folder=clips")
      .header("content-type", "image/gif")
      .header("x-file-name", "spin.gif")
      .body(Body::from(&b"GIF89a;"[..]))
      .unwrap();
    let resp = router.clone().oneshot(upload).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let url = json["url"].as_str().unwrap().to_owned();

    let fetch = Request::builder().uri(&url).body(Body::empty()).unwrap();
    let resp = router.oneshot(fetch).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let served = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&served[..], b"GIF89a;");
  }

  #[tokio::test]
  async fn export_writes_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let content = ContentRepository::new(store.clone());
    for slug in ["first", "second"] {
      content
        .create_project(NewProject {
          title: Some(slug.to_owned()),
          slug: Some(slug.to_owned()),
          category: Some("Film".to_owned()),
          thumbnail: Some(format!("https://cdn/{slug}.jpg")),
          ..Default::default()
        })
        .await
        .unwrap();
    }

    let out = dir.path().join("projects.json");
    assert_eq!(export_projects(store, &out).await.unwrap(), 2);

    let written: serde_json::Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
    assert_eq!(written[0]["slug"], "second");
    assert_eq!(written[1]["slug"], "first");
  }
}
