//! In-memory views over a list of projects, as used by the public pages:
//! search, category facets, related projects and the flattened gallery.

use serde::Serialize;
use uuid::Uuid;

use crate::{project::Project, slug::slugify};

/// A distinct category facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
  /// `slugify(label)`; the URL segment.
  pub segment: String,
  /// The category text as first seen.
  pub label:   String,
}

/// Case-insensitive substring match over title, category and description.
/// A blank query matches everything.
pub fn search<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return projects.iter().collect();
  }
  projects
    .iter()
    .filter(|p| {
      p.title.to_lowercase().contains(&needle)
        || p.category.to_lowercase().contains(&needle)
        || p
          .description
          .as_deref()
          .is_some_and(|d| d.to_lowercase().contains(&needle))
    })
    .collect()
}

/// Projects whose normalised category equals `segment`.
pub fn in_category<'a>(projects: &'a [Project], segment: &str) -> Vec<&'a Project> {
  let segment = slugify(segment);
  projects.iter().filter(|p| slugify(&p.category) == segment).collect()
}

/// Distinct categories in first-seen order. Categories that normalise to an
/// empty segment are skipped.
pub fn categories(projects: &[Project]) -> Vec<Category> {
  let mut out: Vec<Category> = Vec::new();
  for p in projects {
    let segment = slugify(&p.category);
    if segment.is_empty() || out.iter().any(|c| c.segment == segment) {
      continue;
    }
    out.push(Category { segment, label: p.category.clone() });
  }
  out
}

/// Up to `limit` other projects, those sharing the current one's category
/// first, each group keeping the input order.
pub fn related<'a>(projects: &'a [Project], current: Uuid, limit: usize) -> Vec<&'a Project> {
  let segment = projects
    .iter()
    .find(|p| p.id == current)
    .map(|p| slugify(&p.category));

  let (mut same, other): (Vec<&Project>, Vec<&Project>) = projects
    .iter()
    .filter(|p| p.id != current)
    .partition(|p| segment.as_deref() == Some(slugify(&p.category).as_str()));

  same.extend(other);
  same.truncate(limit);
  same
}

/// Every gallery URL across `projects`, in project then gallery order.
pub fn gallery_images(projects: &[Project]) -> Vec<&str> {
  projects
    .iter()
    .flat_map(|p| p.gallery.iter().map(String::as_str))
    .collect()
}
