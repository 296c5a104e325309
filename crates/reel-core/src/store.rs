//! The `ContentStore` trait.
//!
//! Implemented by storage backends (e.g. `reel-store-sqlite`). Validation and
//! invariants live one layer up in [`crate::repository::ContentRepository`];
//! a store only persists and retrieves documents.

use std::future::Future;

use uuid::Uuid;

use crate::{
  project::Project,
  settings::{SettingsPatch, SiteSettings},
};

/// Abstraction over the document store holding projects and settings.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Projects ──────────────────────────────────────────────────────────

  /// Persist a new project document under `project.id`. Returns `false`,
  /// storing nothing, if another project already holds `project.slug`.
  fn insert_project<'a>(
    &'a self,
    project: &'a Project,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn get_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Return the first project whose slug equals `slug`.
  fn find_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + 'a;

  /// All projects, newest `created_at` first.
  fn list_projects(
    &self,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + '_;

  /// Overwrite an existing document. Returns `false` if `project.id` does not
  /// exist.
  fn replace_project<'a>(
    &'a self,
    project: &'a Project,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Returns `false` if nothing was deleted.
  fn delete_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  /// Return the settings record, atomically creating it from `default` if it
  /// does not exist.
  fn settings_or_init(
    &self,
    default: SiteSettings,
  ) -> impl Future<Output = Result<SiteSettings, Self::Error>> + Send + '_;

  /// Merge `patch` into the stored record (creating it from `default` first
  /// if absent) and return the result.
  fn merge_settings(
    &self,
    patch: SettingsPatch,
    default: SiteSettings,
  ) -> impl Future<Output = Result<SiteSettings, Self::Error>> + Send + '_;
}
