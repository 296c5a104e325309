//! Site settings handlers. The record is created with its default on first
//! read, so `GET` never 404s.

use axum::{Json, extract::State};
use reel_core::{
  repository::ContentRepository,
  settings::{SettingsPatch, SiteSettings},
  store::ContentStore,
};
use serde_json::{Value, json};

use crate::error::{ApiError, JsonBody};

/// `GET /getSettings`
pub async fn get<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
) -> Result<Json<SiteSettings>, ApiError> {
  let settings = content
    .get_settings()
    .await
    .map_err(ApiError::content("Failed to fetch settings"))?;
  Ok(Json(settings))
}

/// `POST /updateSettings`: body: `{"heroVideoUrl": "..."}`, merged into the
/// stored record.
pub async fn update<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
  JsonBody(patch): JsonBody<SettingsPatch>,
) -> Result<Json<Value>, ApiError> {
  let settings = content
    .update_settings(patch)
    .await
    .map_err(ApiError::content("Failed to update settings"))?;
  Ok(Json(json!({ "success": true, "heroVideoUrl": settings.hero_video_url })))
}
