//! Read-only catalog views used by the public pages.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use reel_core::{
  catalog::{self, Category},
  project::Project,
  repository::ContentRepository,
  store::ContentStore,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  /// Free text; blank returns every project.
  #[serde(default)]
  pub q: String,
}

fn default_related_limit() -> usize { 3 }

#[derive(Debug, Deserialize)]
pub struct RelatedParams {
  #[serde(default = "default_related_limit")]
  pub limit: usize,
}

/// `GET /searchProjects?q=<text>`
pub async fn search<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Project>>, ApiError> {
  let projects = content
    .list_projects()
    .await
    .map_err(ApiError::content("Failed to search projects"))?;
  Ok(Json(catalog::search(&projects, &params.q).into_iter().cloned().collect()))
}

/// `GET /getCategories`
pub async fn categories<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
) -> Result<Json<Vec<Category>>, ApiError> {
  let projects = content
    .list_projects()
    .await
    .map_err(ApiError::content("Failed to fetch categories"))?;
  Ok(Json(catalog::categories(&projects)))
}

/// `GET /getProjectsByCategory/{segment}`
pub async fn by_category<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
  Path(segment): Path<String>,
) -> Result<Json<Vec<Project>>, ApiError> {
  let projects = content
    .list_projects()
    .await
    .map_err(ApiError::content("Failed to fetch projects"))?;
  Ok(Json(catalog::in_category(&projects, &segment).into_iter().cloned().collect()))
}

/// `GET /getRelatedProjects/{slug}?limit=<n>`
///
/// Other projects for the "more work" strip, same category first.
pub async fn related<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
  Path(slug): Path<String>,
  Query(params): Query<RelatedParams>,
) -> Result<Json<Vec<Project>>, ApiError> {
  let projects = content
    .list_projects()
    .await
    .map_err(ApiError::content("Failed to fetch related projects"))?;
  let current = projects
    .iter()
    .find(|p| p.slug == slug)
    .ok_or_else(|| ApiError::NotFound("Project not found".to_owned()))?;
  Ok(Json(catalog::related(&projects, current.id, params.limit).into_iter().cloned().collect()))
}

/// `GET /getGallery`
pub async fn gallery<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
) -> Result<Json<Vec<String>>, ApiError> {
  let projects = content
    .list_projects()
    .await
    .map_err(ApiError::content("Failed to fetch gallery"))?;
  Ok(Json(catalog::gallery_images(&projects).into_iter().map(str::to_owned).collect()))
}
