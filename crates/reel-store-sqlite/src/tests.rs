//! Integration tests for `SqliteStore` and the content repository against an
//! in-memory database.

use std::sync::Arc;

use reel_core::{
  Error as CoreError,
  project::{Credit, MediaKind, NewProject, ProjectPatch},
  repository::ContentRepository,
  settings::{DEFAULT_HERO_VIDEO_URL, SettingsPatch, SiteSettings},
  store::ContentStore,
  whitelist::{WhitelistEntry, WhitelistStore},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn repo() -> ContentRepository<SqliteStore> {
  ContentRepository::new(Arc::new(store().await))
}

fn fields(title: &str, slug: &str) -> NewProject {
  NewProject {
    title: Some(title.into()),
    slug: Some(slug.into()),
    category: Some("Commercial".into()),
    thumbnail: Some("http://x/y.jpg".into()),
    ..Default::default()
  }
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_round_trips_visible_fields() {
  let r = repo().await;
  let input = NewProject {
    description: Some("A cinematic exploration".into()),
    gallery: vec!["https://cdn/1.jpg".into(), "https://cdn/2.jpg".into()],
    credits: vec![Credit { role: "Director".into(), name: "Ana".into() }],
    ..fields("T", "t")
  };

  let created = r.create_project(input).await.unwrap();
  assert_eq!(created.title, "T");
  assert_eq!(created.slug, "t");
  assert_eq!(created.category, "Commercial");
  assert_eq!(created.thumbnail, "http://x/y.jpg");
  assert_eq!(created.thumbnail_kind, MediaKind::Image);

  let fetched = r.get_project("t").await.unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.gallery, vec!["https://cdn/1.jpg", "https://cdn/2.jpg"]);
  assert_eq!(fetched.credits[0].role, "Director");
}

#[tokio::test]
async fn create_missing_fields_names_all_of_them() {
  let r = repo().await;
  let err = r
    .create_project(NewProject { title: Some("T".into()), ..Default::default() })
    .await
    .unwrap_err();
  match err {
    CoreError::Validation(missing) => {
      assert_eq!(missing, vec!["slug", "category", "thumbnail"]);
    }
    other => panic!("expected validation error, got {other:?}"),
  }
  assert!(r.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_duplicate_slug() {
  let r = repo().await;
  r.create_project(fields("One", "same")).await.unwrap();
  let err = r.create_project(fields("Two", "same")).await.unwrap_err();
  assert!(matches!(err, CoreError::DuplicateSlug(ref s) if s == "same"));
  assert_eq!(r.list_projects().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_with_one_slug_keep_one() {
  let r = repo().await;
  let (a, b) = tokio::join!(
    tokio::spawn({
      let r = r.clone();
      async move { r.create_project(fields("One", "race")).await }
    }),
    tokio::spawn({
      let r = r.clone();
      async move { r.create_project(fields("Two", "race")).await }
    }),
  );
  let results = [a.unwrap(), b.unwrap()];

  assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
  assert!(
    results
      .iter()
      .any(|r| matches!(r, Err(CoreError::DuplicateSlug(s)) if s == "race"))
  );
  assert_eq!(r.list_projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn store_refuses_second_project_with_same_slug() {
  let s = store().await;
  let first = fields("One", "taken").into_project(Uuid::new_v4(), chrono::Utc::now()).unwrap();
  let second = fields("Two", "taken").into_project(Uuid::new_v4(), chrono::Utc::now()).unwrap();

  assert!(s.insert_project(&first).await.unwrap());
  assert!(!s.insert_project(&second).await.unwrap());
  assert_eq!(s.get_project(second.id).await.unwrap(), None);
  assert_eq!(s.find_by_slug("taken").await.unwrap().unwrap().id, first.id);
}

#[tokio::test]
async fn list_is_newest_first() {
  let r = repo().await;
  r.create_project(fields("First", "first")).await.unwrap();
  r.create_project(fields("Second", "second")).await.unwrap();
  r.create_project(fields("Third", "third")).await.unwrap();

  let slugs: Vec<_> = r
    .list_projects()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.slug)
    .collect();
  assert_eq!(slugs, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn get_unknown_slug_is_not_found() {
  let r = repo().await;
  let err = r.get_project("nope").await.unwrap_err();
  assert!(matches!(err, CoreError::ProjectNotFound(_)));
}

#[tokio::test]
async fn update_sets_fields_and_updated_at() {
  let r = repo().await;
  let created = r.create_project(fields("T", "t")).await.unwrap();

  let patch = ProjectPatch {
    title: Some("Renamed".into()),
    thumbnail: Some("https://cdn/clip.webm".into()),
    ..Default::default()
  };
  let updated = r.update_project(created.id, patch).await.unwrap();
  assert_eq!(updated.title, "Renamed");
  assert_eq!(updated.thumbnail_kind, MediaKind::Video);
  assert!(updated.updated_at.is_some());
  assert_eq!(updated.created_at, created.created_at);

  let fetched = r.get_project("t").await.unwrap();
  assert_eq!(fetched.title, "Renamed");
}

#[tokio::test]
async fn update_with_slug_is_rejected_and_slug_unchanged() {
  let r = repo().await;
  let created = r.create_project(fields("T", "t")).await.unwrap();

  let patch = ProjectPatch {
    slug: Some("new-value".into()),
    title: Some("X".into()),
    ..Default::default()
  };
  let err = r.update_project(created.id, patch).await.unwrap_err();
  assert!(matches!(err, CoreError::SlugImmutable));

  let fetched = r.get_project("t").await.unwrap();
  assert_eq!(fetched.slug, "t");
  assert_eq!(fetched.title, "T");
  assert!(r.get_project("new-value").await.is_err());
}

#[tokio::test]
async fn update_by_slug_tolerates_same_slug_in_body() {
  let r = repo().await;
  r.create_project(fields("T", "t")).await.unwrap();

  let patch = ProjectPatch {
    slug: Some("t".into()),
    description: Some("now with words".into()),
    ..Default::default()
  };
  let updated = r.update_project_by_slug("t", patch).await.unwrap();
  assert_eq!(updated.description.as_deref(), Some("now with words"));
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
  let r = repo().await;
  let err = r
    .update_project(Uuid::new_v4(), ProjectPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::ProjectNotFound(_)));
}

#[tokio::test]
async fn delete_is_idempotent() {
  let r = repo().await;
  let created = r.create_project(fields("T", "t")).await.unwrap();

  r.delete_project(created.id).await.unwrap();
  r.delete_project(created.id).await.unwrap();
  assert!(r.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_by_unknown_slug_is_not_found() {
  let r = repo().await;
  let err = r.delete_project_by_slug("ghost").await.unwrap_err();
  assert!(matches!(err, CoreError::ProjectNotFound(_)));
}

#[tokio::test]
async fn replace_missing_project_returns_false() {
  let s = store().await;
  let project = fields("T", "t").into_project(Uuid::new_v4(), chrono::Utc::now()).unwrap();
  assert!(!s.replace_project(&project).await.unwrap());
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_are_created_lazily_once() {
  let r = repo().await;
  let first = r.get_settings().await.unwrap();
  assert_eq!(first.hero_video_url, DEFAULT_HERO_VIDEO_URL);

  // A second init with a different default must not overwrite the record.
  let second = r
    .store()
    .settings_or_init(SiteSettings { hero_video_url: "other".into() })
    .await
    .unwrap();
  assert_eq!(second, first);
}

#[tokio::test]
async fn update_settings_merges() {
  let r = repo().await;
  let updated = r
    .update_settings(SettingsPatch { hero_video_url: Some("https://cdn/hero.mp4".into()) })
    .await
    .unwrap();
  assert_eq!(updated.hero_video_url, "https://cdn/hero.mp4");

  let untouched = r.update_settings(SettingsPatch::default()).await.unwrap();
  assert_eq!(untouched.hero_video_url, "https://cdn/hero.mp4");
  assert_eq!(r.get_settings().await.unwrap().hero_video_url, "https://cdn/hero.mp4");
}

// ─── Whitelist ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn whitelist_put_get_and_revoke() {
  let s = store().await;
  assert!(s.get_entry("a@x.com").await.unwrap().is_none());

  s.put_entry(WhitelistEntry::admin("a@x.com")).await.unwrap();
  let entry = s.get_entry("a@x.com").await.unwrap().unwrap();
  assert!(entry.active);
  assert_eq!(entry.role, "admin");

  assert!(s.set_active("a@x.com", false).await.unwrap());
  assert!(!s.get_entry("a@x.com").await.unwrap().unwrap().active);
  assert!(!s.set_active("missing@x.com", false).await.unwrap());
}

#[tokio::test]
async fn whitelist_keys_are_case_sensitive() {
  let s = store().await;
  s.put_entry(WhitelistEntry::admin("A@x.com")).await.unwrap();
  assert!(s.get_entry("a@x.com").await.unwrap().is_none());
  assert_eq!(s.list_entries().await.unwrap().len(), 1);
}
