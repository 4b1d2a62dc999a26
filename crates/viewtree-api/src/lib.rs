//! JSON REST API for ViewTree.
//!
//! Exposes an axum [`Router`] backed by any [`viewtree_core::store::ViewStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility: the
//! hosted auth provider is an external collaborator, so mutation endpoints
//! carry the acting owner id explicitly and every write is scoped by it in
//! the store.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", viewtree_api::api_router(store.clone()))
//! ```

pub mod account;
pub mod error;
pub mod pages;
pub mod profiles;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use viewtree_core::store::ViewStore;

pub use error::ApiError;


/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ViewStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Profiles
    .route(
      "/profiles",
      get(profiles::list::<S>).post(profiles::create::<S>),
    )
    .route(
      "/profiles/{id}",
      get(profiles::get_one::<S>).patch(profiles::update::<S>),
    )
    // Views
    .route("/views", get(views::list::<S>).post(views::create::<S>))
    .route("/views/reorder", post(views::reorder::<S>))
    .route(
      "/views/{id}",
      get(views::get_one::<S>)
        .patch(views::update::<S>)
        .delete(views::delete_one::<S>),
    )
    .route("/views/{id}/copy", post(views::copy_one::<S>))
    // Public pages
    .route("/pages/{username}", get(pages::get_page::<S>))
    // Account removal
    .route("/account/{owner_id}", delete(account::delete_account::<S>))
    .with_state(store)
}
