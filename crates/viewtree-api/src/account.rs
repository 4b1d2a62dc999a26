//! Handler for `DELETE /account/:owner_id`.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use uuid::Uuid;
use viewtree_core::store::ViewStore;

use crate::error::ApiError;

/// `DELETE /account/:owner_id` — removes the owner's views and then the
/// profile; 204 on success. Idempotent: deleting an absent account is not
/// an error.
pub async fn delete_account<S>(
  State(store): State<Arc<S>>,
  Path(owner_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_account(owner_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
