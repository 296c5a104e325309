//! `POST /uploadMedia?folder=<folder>`
//!
//! The request body is the raw file. `Content-Type` decides how it is
//! processed and `X-File-Name` (optional) names the stored object. Videos
//! wait for their poster frame so the response can carry `posterUrl`; a
//! failed poster just leaves it out.

use axum::{
  Json,
  extract::{Query, State},
  http::{HeaderMap, header},
};
use bytes::Bytes;
use reel_core::project::MediaKind;
use reel_media::{MediaFile, MediaPipeline, ObjectStore, PosterExtractor};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const FILE_NAME_HEADER: &str = "x-file-name";

const DEFAULT_FOLDER: &str = "uploads";

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  pub folder: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
  pub url:        String,
  pub kind:       MediaKind,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub poster_url: Option<String>,
}

pub async fn upload<O, X>(
  State(media): State<MediaPipeline<O, X>>,
  Query(params): Query<UploadParams>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<UploadResponse>, ApiError>
where
  O: ObjectStore + 'static,
  X: PosterExtractor + 'static,
{
  let content_type = header_str(&headers, header::CONTENT_TYPE.as_str())
    .ok_or_else(|| ApiError::BadRequest("missing Content-Type".to_owned()))?;
  let name = header_str(&headers, FILE_NAME_HEADER).unwrap_or("upload");
  let folder = params.folder.as_deref().filter(|f| !f.trim().is_empty()).unwrap_or(DEFAULT_FOLDER);

  let file = MediaFile::new(name, content_type, body);
  let mut task = media
    .upload(file, folder)
    .map_err(ApiError::media("Failed to upload media"))?;
  let poster = task.take_poster();
  let uploaded = task
    .finish()
    .await
    .map_err(ApiError::media("Failed to upload media"))?;

  let poster_url = match poster {
    Some(poster) => poster.url().await,
    None => None,
  };

  Ok(Json(UploadResponse { url: uploaded.url, kind: uploaded.kind, poster_url }))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
}
