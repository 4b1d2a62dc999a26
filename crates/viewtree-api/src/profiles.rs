//! Handlers for `/profiles` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/profiles` | All profiles |
//! | `POST`  | `/profiles` | Body: [`CreateBody`]; username is sanitised |
//! | `GET`   | `/profiles/:id` | 404 if not found |
//! | `PATCH` | `/profiles/:id` | Body: [`ProfilePatch`] |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use viewtree_core::{
  profile::{NewProfile, Profile, ProfilePatch, SocialLinks, Theme},
  store::ViewStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /profiles`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profiles = store.list_profiles().await.map_err(ApiError::from_store)?;
  Ok(Json(profiles))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub username:     String,
  pub display_name: Option<String>,
  pub bio:          Option<String>,
  #[serde(default)]
  pub theme:        Option<Theme>,
  #[serde(default)]
  pub social:       SocialLinks,
}

/// `POST /profiles` — returns 201 + the stored profile.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = NewProfile {
    username:     body.username,
    display_name: body.display_name,
    bio:          body.bio,
    theme:        body.theme.unwrap_or_default(),
    social:       body.social,
  };

  let profile = store
    .create_profile(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(profile)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /profiles/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = store
    .get_profile(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))?;
  Ok(Json(profile))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /profiles/:id` — body is a [`ProfilePatch`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<ProfilePatch>,
) -> Result<Json<Profile>, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = store
    .update_profile(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(profile))
}
