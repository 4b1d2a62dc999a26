//! Handlers for `/views` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/views` | `?owner_id` required; optional `visibility` |
//! | `POST`   | `/views` | Body: [`CreateBody`]; position assigned, 201 |
//! | `GET`    | `/views/:id` | Single view |
//! | `PATCH`  | `/views/:id` | Body carries `owner_id`; ownership-scoped |
//! | `DELETE` | `/views/:id?owner_id=…` | Ownership-scoped |
//! | `POST`   | `/views/reorder` | Commits a display order, returns report |
//! | `POST`   | `/views/:id/copy` | Copy a public view into the caller's collection |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use viewtree_core::{
  ordering::ReorderReport,
  store::ViewStore,
  view::{Category, NewView, Stem, View, ViewPatch, Visibility},
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the owner whose views to return.
  pub owner_id:   Uuid,
  /// If set, restrict to views with this visibility.
  pub visibility: Option<Visibility>,
}

/// `GET /views?owner_id=<id>[&visibility=public|private]`
///
/// Always returns the ordered read: position ascending with nulls last,
/// then creation time descending.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<View>>, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let views = store
    .list_views(params.owner_id, params.visibility)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(views))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /views`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub owner_id:    Uuid,
  pub stem:        Stem,
  pub statement:   String,
  pub description: Option<String>,
  pub category:    Category,
  pub visibility:  Option<Visibility>,
}

impl From<CreateBody> for NewView {
  fn from(b: CreateBody) -> Self {
    NewView {
      owner_id:    b.owner_id,
      stem:        b.stem,
      statement:   b.statement,
      description: b.description,
      category:    b.category,
      visibility:  b.visibility.unwrap_or(Visibility::Public),
    }
  }
}

/// `POST /views` — returns 201 + the stored view, prepended to the owner's
/// collection.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let view = store
    .create_view(NewView::from(body))
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /views/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<View>, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let view = store
    .get_view(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("view {id} not found")))?;
  Ok(Json(view))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /views/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  /// The acting owner; the store rejects a mismatch.
  pub owner_id: Uuid,
  #[serde(flatten)]
  pub patch:    ViewPatch,
}

/// `PATCH /views/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<View>, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let view = store
    .update_view(id, body.owner_id, body.patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(view))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub owner_id: Uuid,
}

/// `DELETE /views/:id?owner_id=<id>` — 204 on success; 404 when no view
/// matches both the id and the owner.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<DeleteParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let removed = store
    .delete_view(id, params.owner_id)
    .await
    .map_err(ApiError::from_store)?;
  if !removed {
    return Err(ApiError::NotFound(format!("view {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Reorder ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /views/reorder`: the complete display order
/// the user settled on.
#[derive(Debug, Deserialize)]
pub struct ReorderBody {
  pub owner_id:    Uuid,
  pub ordered_ids: Vec<Uuid>,
}

/// `POST /views/reorder` — commits the submitted order and returns the
/// per-item [`ReorderReport`]. Partial failure is reported, never rolled
/// back; the caller decides whether to retry or alert the user.
pub async fn reorder<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ReorderBody>,
) -> Result<Json<ReorderReport>, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = store
    .reorder_views(body.owner_id, &body.ordered_ids)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(report))
}

// ─── Copy ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CopyBody {
  /// The collection the copy lands in.
  pub owner_id: Uuid,
}

/// `POST /views/:id/copy` — copy a *public* view into the caller's own
/// collection. The copy is prepended like any new view and is always
/// public; private views are indistinguishable from absent ones.
pub async fn copy_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CopyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ViewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let source = store
    .get_view(id)
    .await
    .map_err(ApiError::from_store)?
    .filter(|v| v.visibility.is_public())
    .ok_or_else(|| ApiError::NotFound(format!("view {id} not found")))?;

  let copy = store
    .create_view(NewView {
      owner_id:    body.owner_id,
      stem:        source.stem,
      statement:   source.statement,
      description: source.description,
      category:    source.category,
      visibility:  Visibility::Public,
    })
    .await
    .map_err(ApiError::from_store)?;

  Ok((StatusCode::CREATED, Json(copy)))
}
