//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is `{"error": "<message>"}`. Store failures carry a fixed
//! per-operation message; the cause is logged and never sent to the client.

use axum::{
  Json,
  extract::{FromRequest, rejection::JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use reel_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("method not allowed")]
  MethodNotAllowed,

  #[error("{0}")]
  Internal(&'static str),
}

impl ApiError {
  /// Map a repository error, using `message` for anything the client should
  /// only see as a generic failure.
  pub fn content(message: &'static str) -> impl FnOnce(CoreError) -> ApiError {
    move |e| match e {
      CoreError::Validation(_) | CoreError::SlugImmutable => ApiError::BadRequest(e.to_string()),
      CoreError::ProjectNotFound(_) => ApiError::NotFound("Project not found".to_owned()),
      CoreError::DuplicateSlug(_) => ApiError::Conflict(e.to_string()),
      CoreError::StoreUnavailable(source) => {
        tracing::error!(error = %source, "{message}");
        ApiError::Internal(message)
      }
    }
  }

  pub fn media(message: &'static str) -> impl FnOnce(reel_media::Error) -> ApiError {
    move |e| match e {
      reel_media::Error::UnsupportedType(_) => ApiError::BadRequest(e.to_string()),
      other => {
        tracing::error!(error = %other, "{message}");
        ApiError::Internal(message)
      }
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

/// A JSON request body whose rejection is an [`ApiError`], so a malformed or
/// mistyped body still answers with `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_owned()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.to_owned()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
