//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store failure by walking its source chain for the domain
  /// error. Backends wrap [`viewtree_core::Error`] for domain failures;
  /// anything else is an internal error.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    use viewtree_core::Error as Core;

    let classified = {
      let mut current: Option<&(dyn std::error::Error + 'static)> = Some(&err);
      let mut found = None;
      while let Some(e) = current {
        if let Some(core) = e.downcast_ref::<Core>() {
          found = match core {
            Core::ProfileNotFound(_)
            | Core::ViewNotFound(_)
            | Core::NotPublic(_) => Some(Self::NotFound(core.to_string())),
            Core::NotOwner { .. } => Some(Self::Forbidden(core.to_string())),
            Core::UsernameTaken(_) => Some(Self::Conflict(core.to_string())),
            Core::InvalidUsername(_)
            | Core::StatementLength { .. }
            | Core::DescriptionLength { .. }
            | Core::CustomStemLength { .. }
            | Core::BioLength { .. }
            | Core::InvalidSocialLink { .. }
            | Core::UnknownStem(_) => Some(Self::BadRequest(core.to_string())),
            Core::Serialization(_) => None,
          };
          break;
        }
        current = e.source();
      }
      found
    };

    match classified {
      Some(api_error) => api_error,
      None => Self::Store(Box::new(err)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
