//! [`ContentRepository`]: the validated CRUD surface over a [`ContentStore`].
//!
//! Every read goes to the store; nothing is cached. Concurrent edits to the
//! same project are last-write-wins.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  project::{NewProject, Project, ProjectPatch},
  settings::{SettingsPatch, SiteSettings},
  store::ContentStore,
};

/// Cloning is cheap; the store is reference-counted.
pub struct ContentRepository<S> {
  store: Arc<S>,
}

impl<S> Clone for ContentRepository<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: ContentStore> ContentRepository<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Projects ──────────────────────────────────────────────────────────────

  /// All projects, newest first.
  pub async fn list_projects(&self) -> Result<Vec<Project>> {
    self.store.list_projects().await.map_err(Error::store)
  }

  pub async fn get_project(&self, slug: &str) -> Result<Project> {
    self
      .store
      .find_by_slug(slug)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::ProjectNotFound(slug.to_owned()))
  }

  /// Validate and persist a new project. Duplicate slugs are rejected.
  pub async fn create_project(&self, input: NewProject) -> Result<Project> {
    let project = input.into_project(Uuid::new_v4(), Utc::now())?;

    if self
      .store
      .find_by_slug(&project.slug)
      .await
      .map_err(Error::store)?
      .is_some()
    {
      return Err(Error::DuplicateSlug(project.slug));
    }

    if !self.store.insert_project(&project).await.map_err(Error::store)? {
      return Err(Error::DuplicateSlug(project.slug));
    }
    info!(id = %project.id, slug = %project.slug, "created project");
    Ok(project)
  }

  /// Apply a partial update to the project with `id`. A patch carrying a
  /// `slug` is rejected outright.
  pub async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Project> {
    if patch.slug.is_some() {
      return Err(Error::SlugImmutable);
    }

    let mut project = self
      .store
      .get_project(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::ProjectNotFound(id.to_string()))?;

    patch.apply(&mut project, Utc::now());

    // The document may have been deleted between the read and the write.
    if !self.store.replace_project(&project).await.map_err(Error::store)? {
      return Err(Error::ProjectNotFound(id.to_string()));
    }
    debug!(id = %project.id, "updated project");
    Ok(project)
  }

  /// Update addressed by slug, as the HTTP surface does. A `slug` in the
  /// patch equal to the addressed slug is tolerated and dropped.
  pub async fn update_project_by_slug(
    &self,
    slug: &str,
    mut patch: ProjectPatch,
  ) -> Result<Project> {
    if patch.slug.as_deref().is_some_and(|s| s == slug) {
      patch.slug = None;
    }
    if patch.slug.is_some() {
      return Err(Error::SlugImmutable);
    }
    let project = self.get_project(slug).await?;
    self.update_project(project.id, patch).await
  }

  /// Delete by id. Deleting an id that does not exist succeeds.
  pub async fn delete_project(&self, id: Uuid) -> Result<()> {
    let deleted = self.store.delete_project(id).await.map_err(Error::store)?;
    if deleted {
      info!(%id, "deleted project");
    } else {
      debug!(%id, "delete of absent project treated as done");
    }
    Ok(())
  }

  /// Delete addressed by slug. Unlike [`Self::delete_project`], an unknown
  /// slug is reported as not found.
  pub async fn delete_project_by_slug(&self, slug: &str) -> Result<()> {
    let project = self.get_project(slug).await?;
    self.delete_project(project.id).await
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  /// Never observes missing settings: the record is created on first read.
  pub async fn get_settings(&self) -> Result<SiteSettings> {
    self
      .store
      .settings_or_init(SiteSettings::default())
      .await
      .map_err(Error::store)
  }

  pub async fn update_settings(&self, patch: SettingsPatch) -> Result<SiteSettings> {
    self
      .store
      .merge_settings(patch, SiteSettings::default())
      .await
      .map_err(Error::store)
  }
}
