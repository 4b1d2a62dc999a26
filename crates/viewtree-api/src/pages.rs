//! Handler for `GET /pages/:username` — the public profile page payload.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Serialize;
use viewtree_core::{
  profile::Profile,
  store::ViewStore,
  view::{View, Visibility},
};

use crate::error::ApiError;

/// Everything a visitor needs to render a user's page: the profile with its
/// privacy toggles applied, and the public views in display order.
#[derive(Debug, Serialize)]
pub struct PublicPage {
  pub profile: Profile,
  pub views:   Vec<View>,
}

/// `GET /pages/:username`
pub async fn get_page<S>(
  State(store): State<Arc<S>>,
  Path(username): Path<String>,
) -> Result<Json<PublicPage>, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = store
    .get_profile_by_username(&username)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("page @{username} not found")))?;

  let views = store
    .list_views(profile.profile_id, Some(Visibility::Public))
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(PublicPage {
    profile: profile.redacted(),
    views,
  }))
}
