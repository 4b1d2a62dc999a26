//! Error types for `viewtree-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("profile not found: {0}")]
  ProfileNotFound(Uuid),

  #[error("view not found: {0}")]
  ViewNotFound(Uuid),

  #[error("username already taken: {0:?}")]
  UsernameTaken(String),

  #[error("invalid username: {0:?} (3-30 chars, lowercase a-z, 0-9, '-')")]
  InvalidUsername(String),

  #[error("view {view_id} is not owned by {owner_id}")]
  NotOwner { view_id: Uuid, owner_id: Uuid },

  #[error("view {0} is not public")]
  NotPublic(Uuid),

  #[error("statement must be 1-{limit} characters, got {len}")]
  StatementLength { len: usize, limit: usize },

  #[error("description must be at most {limit} characters, got {len}")]
  DescriptionLength { len: usize, limit: usize },

  #[error("custom stem must be 1-{limit} characters, got {len}")]
  CustomStemLength { len: usize, limit: usize },

  #[error("bio must be at most {limit} characters, got {len}")]
  BioLength { len: usize, limit: usize },

  #[error("invalid {platform} link: {value:?}")]
  InvalidSocialLink { platform: String, value: String },

  #[error("unknown stem discriminant: {0:?}")]
  UnknownStem(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
