//! Integration tests for `SqliteStore` against an in-memory database.

use uuid::Uuid;
use viewtree_core::{
  ordering::ReorderOutcome,
  profile::{NewProfile, ProfilePatch, Theme},
  store::ViewStore,
  view::{Category, NewView, Stem, ViewPatch, Visibility},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn profile(s: &SqliteStore, username: &str) -> Uuid {
  s.create_profile(NewProfile::new(username))
    .await
    .unwrap()
    .profile_id
}

fn view(owner: Uuid, statement: &str) -> NewView {
  NewView::new(owner, Stem::IBelieve, statement)
}

/// Force specific position values, bypassing the manager — used to model
/// collections created before positions existed (null) or with sparse keys.
async fn set_position(s: &SqliteStore, view_id: Uuid, position: Option<i64>) {
  let id = view_id.hyphenated().to_string();
  s.conn
    .call(move |conn| {
      conn.execute(
        "UPDATE views SET position = ?1 WHERE view_id = ?2",
        rusqlite::params![position, id],
      )?;
      Ok(())
    })
    .await
    .unwrap();
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_profile() {
  let s = store().await;

  let created = s.create_profile(NewProfile::new("ada")).await.unwrap();
  assert_eq!(created.username, "ada");
  assert_eq!(created.theme, Theme::default());

  let fetched = s.get_profile(created.profile_id).await.unwrap().unwrap();
  assert_eq!(fetched.profile_id, created.profile_id);
  assert_eq!(fetched.username, "ada");
}

#[tokio::test]
async fn create_profile_normalizes_username() {
  let s = store().await;
  let created = s
    .create_profile(NewProfile::new("Ada Lovelace"))
    .await
    .unwrap();
  assert_eq!(created.username, "adalovelace");
}

#[tokio::test]
async fn duplicate_username_rejected() {
  let s = store().await;
  s.create_profile(NewProfile::new("ada")).await.unwrap();

  let err = s.create_profile(NewProfile::new("ada")).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(viewtree_core::Error::UsernameTaken(u)) if u == "ada"
  ));
}

#[tokio::test]
async fn too_short_username_rejected() {
  let s = store().await;
  // Normalisation strips the symbols, leaving two chars.
  let err = s.create_profile(NewProfile::new("a!b")).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(viewtree_core::Error::InvalidUsername(_))
  ));
}

#[tokio::test]
async fn get_profile_by_username() {
  let s = store().await;
  let id = profile(&s, "ada").await;

  let found = s.get_profile_by_username("ada").await.unwrap().unwrap();
  assert_eq!(found.profile_id, id);

  assert!(s.get_profile_by_username("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn update_profile_patch() {
  let s = store().await;
  let id = profile(&s, "ada").await;

  let patch = ProfilePatch {
    display_name: Some(Some("Ada".into())),
    bio: Some(Some("mathematician".into())),
    hide_bio: Some(true),
    ..Default::default()
  };
  let updated = s.update_profile(id, patch).await.unwrap();

  assert_eq!(updated.display_name.as_deref(), Some("Ada"));
  assert_eq!(updated.bio.as_deref(), Some("mathematician"));
  assert!(updated.hide_bio);
  assert!(updated.updated_at >= updated.created_at);
}

#[tokio::test]
async fn update_profile_username_conflict() {
  let s = store().await;
  profile(&s, "ada").await;
  let id = profile(&s, "grace").await;

  let patch = ProfilePatch {
    username: Some("ada".into()),
    ..Default::default()
  };
  let err = s.update_profile(id, patch).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(viewtree_core::Error::UsernameTaken(_))
  ));
}

// ─── Position assignment ─────────────────────────────────────────────────────

#[tokio::test]
async fn first_view_gets_position_zero() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let v = s.create_view(view(owner, "first")).await.unwrap();
  assert_eq!(v.position, Some(0));
}

#[tokio::test]
async fn each_insert_prepends() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let a = s.create_view(view(owner, "a")).await.unwrap();
  let b = s.create_view(view(owner, "b")).await.unwrap();
  let c = s.create_view(view(owner, "c")).await.unwrap();

  assert_eq!(a.position, Some(0));
  assert_eq!(b.position, Some(-1));
  assert_eq!(c.position, Some(-2));
}

#[tokio::test]
async fn insertion_reads_back_most_recent_first() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let mut ids = Vec::new();
  for i in 0..5 {
    ids.push(
      s.create_view(view(owner, &format!("v{i}")))
        .await
        .unwrap()
        .view_id,
    );
  }

  let listed: Vec<Uuid> = s
    .list_views(owner, None)
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.view_id)
    .collect();

  ids.reverse();
  assert_eq!(listed, ids);
}

#[tokio::test]
async fn positions_are_per_owner() {
  let s = store().await;
  let ada = profile(&s, "ada").await;
  let grace = profile(&s, "grace").await;

  s.create_view(view(ada, "a1")).await.unwrap();
  s.create_view(view(ada, "a2")).await.unwrap();
  let g = s.create_view(view(grace, "g1")).await.unwrap();

  // Grace's first view is unaffected by Ada's collection.
  assert_eq!(g.position, Some(0));
}

#[tokio::test]
async fn sparse_positions_with_null_scenario() {
  // Owner has A(pos=5), B(pos=2), C(pos=null): ordered read yields
  // [B, A, C]. Inserting D assigns 2 - 1 = 1 and the read yields
  // [D, B, A, C].
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let a = s.create_view(view(owner, "A")).await.unwrap().view_id;
  let b = s.create_view(view(owner, "B")).await.unwrap().view_id;
  let c = s.create_view(view(owner, "C")).await.unwrap().view_id;
  set_position(&s, a, Some(5)).await;
  set_position(&s, b, Some(2)).await;
  set_position(&s, c, None).await;

  let order: Vec<Uuid> = s
    .list_views(owner, None)
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.view_id)
    .collect();
  assert_eq!(order, vec![b, a, c]);

  let d = s.create_view(view(owner, "D")).await.unwrap();
  assert_eq!(d.position, Some(1));

  let order: Vec<Uuid> = s
    .list_views(owner, None)
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.view_id)
    .collect();
  assert_eq!(order, vec![d.view_id, b, a, c]);
}

#[tokio::test]
async fn all_null_positions_default_to_zero() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let a = s.create_view(view(owner, "A")).await.unwrap().view_id;
  set_position(&s, a, None).await;

  let b = s.create_view(view(owner, "B")).await.unwrap();
  assert_eq!(b.position, Some(0));
}

#[tokio::test]
async fn rebase_kicks_in_below_floor() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let a = s.create_view(view(owner, "A")).await.unwrap().view_id;
  let b = s.create_view(view(owner, "B")).await.unwrap().view_id;
  set_position(&s, a, Some(viewtree_core::ordering::REBASE_FLOOR - 5)).await;
  set_position(&s, b, Some(viewtree_core::ordering::REBASE_FLOOR - 4)).await;

  let c = s.create_view(view(owner, "C")).await.unwrap();

  // Existing rows were rebased to 0..N-1 and the new view prepended.
  assert_eq!(c.position, Some(-1));
  let views = s.list_views(owner, None).await.unwrap();
  let positions: Vec<Option<i64>> = views.iter().map(|v| v.position).collect();
  assert_eq!(positions, vec![Some(-1), Some(0), Some(1)]);
}

// ─── Reorder ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reorder_reproduces_submitted_sequence() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let v1 = s.create_view(view(owner, "v1")).await.unwrap().view_id;
  let v2 = s.create_view(view(owner, "v2")).await.unwrap().view_id;
  let v3 = s.create_view(view(owner, "v3")).await.unwrap().view_id;

  let want = vec![v3, v1, v2];
  let report = s.reorder_views(owner, &want).await.unwrap();
  assert!(report.all_applied());

  let got: Vec<Uuid> = s
    .list_views(owner, None)
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.view_id)
    .collect();
  assert_eq!(got, want);
}

#[tokio::test]
async fn reorder_assigns_zero_based_positions() {
  // [D, B, A, C] dragged into [A, B, C, D] commits A=0, B=1, C=2, D=3.
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let a = s.create_view(view(owner, "A")).await.unwrap().view_id;
  let b = s.create_view(view(owner, "B")).await.unwrap().view_id;
  let c = s.create_view(view(owner, "C")).await.unwrap().view_id;
  let d = s.create_view(view(owner, "D")).await.unwrap().view_id;

  s.reorder_views(owner, &[a, b, c, d]).await.unwrap();

  let views = s.list_views(owner, None).await.unwrap();
  let got: Vec<(Uuid, Option<i64>)> =
    views.iter().map(|v| (v.view_id, v.position)).collect();
  assert_eq!(
    got,
    vec![(a, Some(0)), (b, Some(1)), (c, Some(2)), (d, Some(3))]
  );
}

#[tokio::test]
async fn reorder_is_idempotent() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let v1 = s.create_view(view(owner, "v1")).await.unwrap().view_id;
  let v2 = s.create_view(view(owner, "v2")).await.unwrap().view_id;

  let order = vec![v2, v1];
  s.reorder_views(owner, &order).await.unwrap();
  let first: Vec<_> = s.list_views(owner, None).await.unwrap();

  s.reorder_views(owner, &order).await.unwrap();
  let second: Vec<_> = s.list_views(owner, None).await.unwrap();

  let key = |vs: &[viewtree_core::view::View]| {
    vs.iter().map(|v| (v.view_id, v.position)).collect::<Vec<_>>()
  };
  assert_eq!(key(&first), key(&second));
}

#[tokio::test]
async fn reorder_never_touches_other_owners() {
  let s = store().await;
  let ada = profile(&s, "ada").await;
  let grace = profile(&s, "grace").await;

  let mine = s.create_view(view(ada, "mine")).await.unwrap().view_id;
  let theirs = s.create_view(view(grace, "theirs")).await.unwrap();

  // A malicious order list naming another owner's view.
  let report = s.reorder_views(ada, &[theirs.view_id, mine]).await.unwrap();

  assert!(!report.all_applied());
  assert_eq!(report.applied_count(), 1);
  assert!(matches!(report.items[0].1, ReorderOutcome::NotFound));

  // Grace's view keeps its original position.
  let after = s.get_view(theirs.view_id).await.unwrap().unwrap();
  assert_eq!(after.position, theirs.position);
}

#[tokio::test]
async fn reorder_reports_unknown_ids() {
  let s = store().await;
  let owner = profile(&s, "ada").await;
  let v1 = s.create_view(view(owner, "v1")).await.unwrap().view_id;

  let report = s
    .reorder_views(owner, &[Uuid::new_v4(), v1])
    .await
    .unwrap();

  assert_eq!(report.applied_count(), 1);
  assert!(matches!(report.items[0].1, ReorderOutcome::NotFound));
  assert!(matches!(
    report.items[1].1,
    ReorderOutcome::Applied { position: 1 }
  ));
}

// ─── View CRUD ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_view_roundtrips_fields() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let mut input = view(owner, "ranked-choice voting");
  input.stem = Stem::ISupport;
  input.category = Category::Politics;
  input.description = Some("for all statewide races".into());
  input.visibility = Visibility::Private;

  let created = s.create_view(input).await.unwrap();
  let fetched = s.get_view(created.view_id).await.unwrap().unwrap();

  assert_eq!(fetched.stem, Stem::ISupport);
  assert_eq!(fetched.statement, "ranked-choice voting");
  assert_eq!(fetched.description.as_deref(), Some("for all statewide races"));
  assert_eq!(fetched.category, Category::Politics);
  assert_eq!(fetched.visibility, Visibility::Private);
  assert!(!fetched.pinned);
}

#[tokio::test]
async fn custom_stem_roundtrips() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let mut input = view(owner, "it might rain");
  input.stem = Stem::Custom("I suspect".into());

  let created = s.create_view(input).await.unwrap();
  let fetched = s.get_view(created.view_id).await.unwrap().unwrap();
  assert_eq!(fetched.stem, Stem::Custom("I suspect".into()));
}

#[tokio::test]
async fn invalid_statement_rejected() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let err = s.create_view(view(owner, "")).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(viewtree_core::Error::StatementLength { .. })
  ));
}

#[tokio::test]
async fn list_views_visibility_filter() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  s.create_view(view(owner, "open")).await.unwrap();
  let mut hidden = view(owner, "hidden");
  hidden.visibility = Visibility::Private;
  s.create_view(hidden).await.unwrap();

  let public = s
    .list_views(owner, Some(Visibility::Public))
    .await
    .unwrap();
  assert_eq!(public.len(), 1);
  assert_eq!(public[0].statement, "open");

  let all = s.list_views(owner, None).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn update_view_scoped_by_owner() {
  let s = store().await;
  let ada = profile(&s, "ada").await;
  let grace = profile(&s, "grace").await;

  let v = s.create_view(view(ada, "original")).await.unwrap();

  let patch = ViewPatch {
    statement: Some("hijacked".into()),
    ..Default::default()
  };
  let err = s.update_view(v.view_id, grace, patch).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(viewtree_core::Error::NotOwner { .. })
  ));

  let unchanged = s.get_view(v.view_id).await.unwrap().unwrap();
  assert_eq!(unchanged.statement, "original");
}

#[tokio::test]
async fn update_view_applies_patch() {
  let s = store().await;
  let owner = profile(&s, "ada").await;
  let v = s.create_view(view(owner, "draft")).await.unwrap();

  let patch = ViewPatch {
    statement: Some("final".into()),
    visibility: Some(Visibility::Private),
    ..Default::default()
  };
  let updated = s.update_view(v.view_id, owner, patch).await.unwrap();

  assert_eq!(updated.statement, "final");
  assert_eq!(updated.visibility, Visibility::Private);
  // Ordering is untouched by content edits.
  assert_eq!(updated.position, v.position);
}

#[tokio::test]
async fn delete_view_leaves_gaps() {
  let s = store().await;
  let owner = profile(&s, "ada").await;

  let v1 = s.create_view(view(owner, "v1")).await.unwrap().view_id;
  let v2 = s.create_view(view(owner, "v2")).await.unwrap().view_id;
  let v3 = s.create_view(view(owner, "v3")).await.unwrap().view_id;

  assert!(s.delete_view(v2, owner).await.unwrap());
  assert!(!s.delete_view(v2, owner).await.unwrap());

  // Remaining positions are not compacted: -2 and 0 survive.
  let views = s.list_views(owner, None).await.unwrap();
  let got: Vec<(Uuid, Option<i64>)> =
    views.iter().map(|v| (v.view_id, v.position)).collect();
  assert_eq!(got, vec![(v3, Some(-2)), (v1, Some(0))]);
}

#[tokio::test]
async fn delete_view_scoped_by_owner() {
  let s = store().await;
  let ada = profile(&s, "ada").await;
  let grace = profile(&s, "grace").await;

  let v = s.create_view(view(ada, "keep me")).await.unwrap();
  assert!(!s.delete_view(v.view_id, grace).await.unwrap());
  assert!(s.get_view(v.view_id).await.unwrap().is_some());
}

// ─── Account removal ─────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_account_cascades() {
  let s = store().await;
  let ada = profile(&s, "ada").await;
  let grace = profile(&s, "grace").await;

  s.create_view(view(ada, "v1")).await.unwrap();
  s.create_view(view(ada, "v2")).await.unwrap();
  let kept = s.create_view(view(grace, "kept")).await.unwrap();

  s.delete_account(ada).await.unwrap();

  assert!(s.get_profile(ada).await.unwrap().is_none());
  assert!(s.list_views(ada, None).await.unwrap().is_empty());

  // Other accounts are untouched.
  assert!(s.get_profile(grace).await.unwrap().is_some());
  assert!(s.get_view(kept.view_id).await.unwrap().is_some());
}
