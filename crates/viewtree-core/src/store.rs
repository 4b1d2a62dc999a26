//! The `ViewStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `viewtree-store-sqlite`). Higher layers (`viewtree-api`,
//! `viewtree-server`) depend on this abstraction, not on any concrete
//! backend.
//!
//! All listing reads honor the ordered-read contract of
//! [`crate::ordering`]: `position` ascending with nulls last, then
//! `created_at` descending.

use std::future::Future;

use uuid::Uuid;

use crate::{
  ordering::ReorderReport,
  profile::{NewProfile, Profile, ProfilePatch},
  view::{NewView, View, ViewPatch, Visibility},
};

/// Abstraction over a ViewTree storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ViewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create and persist a new profile. Fails if the username is taken or
  /// invalid.
  fn create_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Retrieve a profile by id. Returns `None` if not found.
  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Retrieve a profile by its unique username.
  fn get_profile_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// List every profile.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Apply a partial update and return the updated profile.
  /// Bumps `updated_at`; re-checks username uniqueness when it changes.
  fn update_profile(
    &self,
    id: Uuid,
    patch: ProfilePatch,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  // ── Views ─────────────────────────────────────────────────────────────

  /// Create a view, assigning it a position strictly before every existing
  /// view of the same owner (see [`crate::ordering::initial_position`]).
  fn create_view(
    &self,
    input: NewView,
  ) -> impl Future<Output = Result<View, Self::Error>> + Send + '_;

  /// Retrieve a single view by id.
  fn get_view(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<View>, Self::Error>> + Send + '_;

  /// Ordered read of an owner's collection, optionally filtered by
  /// visibility.
  fn list_views(
    &self,
    owner_id: Uuid,
    visibility: Option<Visibility>,
  ) -> impl Future<Output = Result<Vec<View>, Self::Error>> + Send + '_;

  /// Apply a partial update to a view. The write is scoped by view id AND
  /// owner id; a mismatched owner is an error, not a silent no-op.
  fn update_view(
    &self,
    view_id: Uuid,
    owner_id: Uuid,
    patch: ViewPatch,
  ) -> impl Future<Output = Result<View, Self::Error>> + Send + '_;

  /// Delete a view, scoped by owner. Returns `true` if a row was removed.
  /// Surrounding positions are not compacted; gaps are expected.
  fn delete_view(
    &self,
    view_id: Uuid,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The minimum position among the owner's views, ignoring nulls.
  /// `None` when the collection is empty or entirely unpositioned.
  fn min_position(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  /// Commit a user-supplied display order: each view's position becomes its
  /// zero-based index in `ordered_ids`. Updates are independent and scoped
  /// by owner; per-item failures are reported, not propagated.
  fn reorder_views<'a>(
    &'a self,
    owner_id: Uuid,
    ordered_ids: &'a [Uuid],
  ) -> impl Future<Output = Result<ReorderReport, Self::Error>> + Send + 'a;

  // ── Account removal ───────────────────────────────────────────────────

  /// Delete an account: all of the owner's views first, then the profile.
  fn delete_account(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
