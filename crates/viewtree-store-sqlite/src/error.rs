//! Error type for `viewtree-store-sqlite`.
//!
//! Domain failures (not-found, ownership, validation, username conflicts)
//! are always reported as [`viewtree_core::Error`] wrapped in [`Error::Core`]
//! so callers can classify them without depending on this crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] viewtree_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
