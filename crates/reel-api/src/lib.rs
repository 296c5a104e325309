//! JSON HTTP API for Reel.
//!
//! Exposes an axum [`Router`] backed by any [`ContentStore`] and a
//! [`MediaPipeline`]. Every response carries a permissive CORS header. A
//! known path hit with the wrong method answers with a JSON 405; a panicking
//! handler becomes a generic 500.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = reel_api::api_router(content, media);
//! axum::serve(listener, app).await?;
//! ```

pub mod catalog;
pub mod error;
pub mod media;
pub mod projects;
pub mod settings;

use std::any::Any;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  response::{IntoResponse, Response},
  routing::{MethodRouter, delete, get, post, put},
};
use reel_core::{repository::ContentRepository, store::ContentStore};
use reel_media::{MediaPipeline, ObjectStore, PosterExtractor};
use tower_http::{
  catch_panic::CatchPanicLayer,
  cors::{Any as AnyOrigin, CorsLayer},
  trace::TraceLayer,
};

pub use error::ApiError;

/// Upper bound on a single `/uploadMedia` body.
pub const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Build the full API router.
///
/// The returned `Router<()>` can be nested or merged into any parent router.
pub fn api_router<S, O, X>(content: ContentRepository<S>, media: MediaPipeline<O, X>) -> Router<()>
where
  S: ContentStore + 'static,
  O: ObjectStore + 'static,
  X: PosterExtractor + 'static,
{
  let cors = CorsLayer::new()
    .allow_origin(AnyOrigin)
    .allow_methods(AnyOrigin)
    .allow_headers(AnyOrigin);

  content_router(content)
    .merge(media_router(media))
    .layer(CatchPanicLayer::custom(panic_response))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
}

fn content_router<S: ContentStore + 'static>(content: ContentRepository<S>) -> Router<()> {
  Router::new()
    // Projects
    .route("/getProjects", json_405(get(projects::list::<S>)))
    .route("/getProject/{slug}", json_405(get(projects::get_one::<S>)))
    .route("/createProject", json_405(post(projects::create::<S>)))
    .route("/updateProject/{slug}", json_405(put(projects::update::<S>)))
    .route("/deleteProject/{slug}", json_405(delete(projects::delete::<S>)))
    // Settings
    .route("/getSettings", json_405(get(settings::get::<S>)))
    .route("/updateSettings", json_405(post(settings::update::<S>)))
    // Catalog
    .route("/searchProjects", json_405(get(catalog::search::<S>)))
    .route("/getCategories", json_405(get(catalog::categories::<S>)))
    .route("/getProjectsByCategory/{segment}", json_405(get(catalog::by_category::<S>)))
    .route("/getRelatedProjects/{slug}", json_405(get(catalog::related::<S>)))
    .route("/getGallery", json_405(get(catalog::gallery::<S>)))
    .with_state(content)
}

fn media_router<O, X>(media: MediaPipeline<O, X>) -> Router<()>
where
  O: ObjectStore + 'static,
  X: PosterExtractor + 'static,
{
  Router::new()
    .route("/uploadMedia", json_405(post(media::upload::<O, X>)))
    .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
    .with_state(media)
}

fn json_405<T: Clone + Send + Sync + 'static>(route: MethodRouter<T>) -> MethodRouter<T> {
  route.fallback(|| async { ApiError::MethodNotAllowed })
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
  tracing::error!("handler panicked");
  ApiError::Internal("Internal server error").into_response()
}
