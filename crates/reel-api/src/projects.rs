//! Project CRUD handlers.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/getProjects` | Newest first |
//! | `GET`    | `/getProject/{slug}` | 404 if not found |
//! | `POST`   | `/createProject` | Body: [`NewProject`]; 400 names missing fields, 409 on a taken slug |
//! | `PUT`    | `/updateProject/{slug}` | Body: [`ProjectPatch`]; slug may only repeat the path slug |
//! | `DELETE` | `/deleteProject/{slug}` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
};
use reel_core::{
  project::{NewProject, Project, ProjectPatch},
  repository::ContentRepository,
  store::ContentStore,
};
use serde_json::{Value, json};

use crate::error::{ApiError, JsonBody};

/// `GET /getProjects`
pub async fn list<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
) -> Result<Json<Vec<Project>>, ApiError> {
  let projects = content
    .list_projects()
    .await
    .map_err(ApiError::content("Failed to fetch projects"))?;
  Ok(Json(projects))
}

/// `GET /getProject/{slug}`
pub async fn get_one<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
  Path(slug): Path<String>,
) -> Result<Json<Project>, ApiError> {
  let project = content
    .get_project(&slug)
    .await
    .map_err(ApiError::content("Failed to fetch project"))?;
  Ok(Json(project))
}

/// `POST /createProject`
pub async fn create<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
  JsonBody(body): JsonBody<NewProject>,
) -> Result<Json<Project>, ApiError> {
  let project = content
    .create_project(body)
    .await
    .map_err(ApiError::content("Failed to create project"))?;
  Ok(Json(project))
}

/// `PUT /updateProject/{slug}`
pub async fn update<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
  Path(slug): Path<String>,
  JsonBody(patch): JsonBody<ProjectPatch>,
) -> Result<Json<Value>, ApiError> {
  content
    .update_project_by_slug(&slug, patch)
    .await
    .map_err(ApiError::content("Failed to update project"))?;
  Ok(Json(json!({ "success": true })))
}

/// `DELETE /deleteProject/{slug}`
pub async fn delete<S: ContentStore>(
  State(content): State<ContentRepository<S>>,
  Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
  content
    .delete_project_by_slug(&slug)
    .await
    .map_err(ApiError::content("Failed to delete project"))?;
  Ok(Json(json!({ "success": true })))
}
