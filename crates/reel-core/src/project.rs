//! Project: the portfolio content entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Media kind ──────────────────────────────────────────────────────────────

/// Whether a stored media URL points at a still image or a video.
///
/// Assigned once when the URL enters the system and stored next to it; never
/// re-derived at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
  #[default]
  Image,
  Video,
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "ogv"];

impl MediaKind {
  /// Classify a URL by the extension of its path component.
  ///
  /// The query string and fragment are ignored, so
  /// `https://cdn/x.jpg?src=clip.mp4` is an image.
  pub fn classify_url(url: &str) -> Self {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default();
    match last.rsplit_once('.') {
      Some((_, ext)) if VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
        MediaKind::Video
      }
      _ => MediaKind::Image,
    }
  }

  /// Classify a MIME type. Returns `None` for anything that is neither an
  /// image nor a video.
  pub fn from_content_type(content_type: &str) -> Option<Self> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.starts_with("image/") {
      Some(MediaKind::Image)
    } else if essence.starts_with("video/") {
      Some(MediaKind::Video)
    } else {
      None
    }
  }
}

// ─── Project ─────────────────────────────────────────────────────────────────

/// One `{role, name}` line of a project's credits. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
  pub role: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id:               Uuid,
  pub title:            String,
  /// Public routing key. Immutable after creation.
  pub slug:             String,
  /// Free text; normalised with [`crate::slug::slugify`] for URL segments.
  pub category:         String,
  pub thumbnail:        String,
  #[serde(default)]
  pub thumbnail_kind:   MediaKind,
  /// Only meaningful when `thumbnail_kind` is [`MediaKind::Video`].
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub thumbnail_poster: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub video_url:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub year:             Option<String>,
  #[serde(default)]
  pub gallery:          Vec<String>,
  #[serde(default)]
  pub credits:          Vec<Credit>,
  pub created_at:       DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at:       Option<DateTime<Utc>>,
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Input for creating a project, as submitted by the admin form.
///
/// The four required fields are optional here so that validation can name
/// every one that is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
  pub title:            Option<String>,
  pub slug:             Option<String>,
  pub category:         Option<String>,
  pub thumbnail:        Option<String>,
  pub thumbnail_kind:   Option<MediaKind>,
  pub thumbnail_poster: Option<String>,
  pub description:      Option<String>,
  pub video_url:        Option<String>,
  pub year:             Option<String>,
  #[serde(default)]
  pub gallery:          Vec<String>,
  #[serde(default)]
  pub credits:          Vec<Credit>,
}

fn present(field: &Option<String>) -> bool {
  field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn non_empty(field: Option<String>) -> Option<String> {
  field.filter(|v| !v.trim().is_empty())
}

impl NewProject {
  /// Names of required fields that are absent or blank, in declaration order.
  pub fn missing_fields(&self) -> Vec<&'static str> {
    [
      ("title", &self.title),
      ("slug", &self.slug),
      ("category", &self.category),
      ("thumbnail", &self.thumbnail),
    ]
    .into_iter()
    .filter(|(_, v)| !present(v))
    .map(|(name, _)| name)
    .collect()
  }

  /// Build the stored record. Fails with [`crate::Error::Validation`] if any
  /// required field is missing.
  pub fn into_project(self, id: Uuid, created_at: DateTime<Utc>) -> crate::Result<Project> {
    let missing = self.missing_fields();
    if !missing.is_empty() {
      return Err(crate::Error::Validation(missing));
    }

    let thumbnail = self.thumbnail.unwrap_or_default();
    let thumbnail_kind = self
      .thumbnail_kind
      .unwrap_or_else(|| MediaKind::classify_url(&thumbnail));

    Ok(Project {
      id,
      title: self.title.unwrap_or_default(),
      slug: self.slug.unwrap_or_default().trim().to_owned(),
      category: self.category.unwrap_or_default(),
      thumbnail,
      thumbnail_kind,
      thumbnail_poster: non_empty(self.thumbnail_poster),
      description: non_empty(self.description),
      video_url: non_empty(self.video_url),
      year: non_empty(self.year),
      gallery: self.gallery,
      credits: self.credits,
      created_at,
      updated_at: None,
    })
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// A partial update. `None` leaves the stored value untouched; an empty
/// string clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
  /// Present only so that an attempt to change it can be rejected.
  pub slug:             Option<String>,
  pub title:            Option<String>,
  pub category:         Option<String>,
  pub thumbnail:        Option<String>,
  pub thumbnail_kind:   Option<MediaKind>,
  pub thumbnail_poster: Option<String>,
  pub description:      Option<String>,
  pub video_url:        Option<String>,
  pub year:             Option<String>,
  pub gallery:          Option<Vec<String>>,
  pub credits:          Option<Vec<Credit>>,
}

fn set_optional(target: &mut Option<String>, value: Option<String>) {
  if let Some(v) = value {
    *target = non_empty(Some(v));
  }
}

impl ProjectPatch {
  /// Apply every present field to `project`. The slug is never touched.
  pub fn apply(self, project: &mut Project, updated_at: DateTime<Utc>) {
    if let Some(title) = non_empty(self.title) {
      project.title = title;
    }
    if let Some(category) = non_empty(self.category) {
      project.category = category;
    }
    if let Some(thumbnail) = non_empty(self.thumbnail) {
      project.thumbnail_kind = self
        .thumbnail_kind
        .unwrap_or_else(|| MediaKind::classify_url(&thumbnail));
      project.thumbnail = thumbnail;
    } else if let Some(kind) = self.thumbnail_kind {
      project.thumbnail_kind = kind;
    }
    set_optional(&mut project.thumbnail_poster, self.thumbnail_poster);
    set_optional(&mut project.description, self.description);
    set_optional(&mut project.video_url, self.video_url);
    set_optional(&mut project.year, self.year);
    if let Some(gallery) = self.gallery {
      project.gallery = gallery;
    }
    if let Some(credits) = self.credits {
      project.credits = credits;
    }
    project.updated_at = Some(updated_at);
  }
}
