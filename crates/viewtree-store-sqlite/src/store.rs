//! [`SqliteStore`] — the SQLite implementation of [`ViewStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;
use viewtree_core::{
  ordering::{self, ReorderOutcome, ReorderReport},
  profile::{normalize_username, NewProfile, Profile, ProfilePatch},
  store::ViewStore,
  view::{NewView, View, ViewPatch, Visibility},
};

use crate::{
  encode::{
    encode_category, encode_dt, encode_social, encode_theme, encode_uuid,
    encode_visibility, RawProfile, RawView,
  },
  schema::SCHEMA,
  Error, Result,
};

const VIEW_COLUMNS: &str = "view_id, owner_id, stem, custom_stem, statement, \
                            description, category, position, pinned, \
                            visibility, created_at, updated_at";

const PROFILE_COLUMNS: &str = "profile_id, username, display_name, bio, \
                               avatar_url, theme, social, hide_display_name, \
                               hide_username, hide_bio, created_at, updated_at";

fn view_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawView> {
  Ok(RawView {
    view_id:     row.get(0)?,
    owner_id:    row.get(1)?,
    stem:        row.get(2)?,
    custom_stem: row.get(3)?,
    statement:   row.get(4)?,
    description: row.get(5)?,
    category:    row.get(6)?,
    position:    row.get(7)?,
    pinned:      row.get(8)?,
    visibility:  row.get(9)?,
    created_at:  row.get(10)?,
    updated_at:  row.get(11)?,
  })
}

fn profile_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    profile_id:        row.get(0)?,
    username:          row.get(1)?,
    display_name:      row.get(2)?,
    bio:               row.get(3)?,
    avatar_url:        row.get(4)?,
    theme:             row.get(5)?,
    social:            row.get(6)?,
    hide_display_name: row.get(7)?,
    hide_username:     row.get(8)?,
    hide_bio:          row.get(9)?,
    created_at:        row.get(10)?,
    updated_at:        row.get(11)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ViewTree store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn username_exists(&self, username: String) -> Result<bool> {
    let taken: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM profiles WHERE username = ?1",
              rusqlite::params![username],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(taken)
  }

  /// Write one position, scoped by view id AND owner id. Returns whether a
  /// row matched.
  async fn write_position(
    &self,
    view_id: Uuid,
    owner_id: Uuid,
    position: i64,
  ) -> Result<bool> {
    let view_id_str = encode_uuid(view_id);
    let owner_id_str = encode_uuid(owner_id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE views SET position = ?1 WHERE view_id = ?2 AND owner_id = ?3",
          rusqlite::params![position, view_id_str, owner_id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  /// Re-commit the current ordered read as positions `0..N-1`. Runs when
  /// repeated prepending has pushed the minimum below the rebase floor.
  async fn rebase_positions(&self, owner_id: Uuid) -> Result<()> {
    let ids: Vec<Uuid> = self
      .list_views(owner_id, None)
      .await?
      .into_iter()
      .map(|v| v.view_id)
      .collect();

    tracing::info!(%owner_id, count = ids.len(), "rebasing view positions");
    self.reorder_views(owner_id, &ids).await?;
    Ok(())
  }

  async fn insert_view(&self, view: &View) -> Result<()> {
    let view_id_str = encode_uuid(view.view_id);
    let owner_id_str = encode_uuid(view.owner_id);
    let stem = view.stem.discriminant().to_owned();
    let custom_stem = match &view.stem {
      viewtree_core::view::Stem::Custom(text) => Some(text.clone()),
      _ => None,
    };
    let statement = view.statement.clone();
    let description = view.description.clone();
    let category = encode_category(view.category)?;
    let position = view.position;
    let pinned = view.pinned;
    let visibility = encode_visibility(view.visibility).to_owned();
    let created_at = encode_dt(view.created_at);
    let updated_at = encode_dt(view.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO views (
             view_id, owner_id, stem, custom_stem, statement, description,
             category, position, pinned, visibility, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            view_id_str,
            owner_id_str,
            stem,
            custom_stem,
            statement,
            description,
            category,
            position,
            pinned,
            visibility,
            created_at,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_profile_where(
    &self,
    condition: &'static str,
    param: String,
  ) -> Result<Option<Profile>> {
    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE {condition}"),
              rusqlite::params![param],
              profile_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn write_profile(&self, profile: &Profile) -> Result<()> {
    let profile_id_str = encode_uuid(profile.profile_id);
    let username = profile.username.clone();
    let display_name = profile.display_name.clone();
    let bio = profile.bio.clone();
    let avatar_url = profile.avatar_url.clone();
    let theme = encode_theme(&profile.theme)?;
    let social = encode_social(&profile.social)?;
    let hide_display_name = profile.hide_display_name;
    let hide_username = profile.hide_username;
    let hide_bio = profile.hide_bio;
    let updated_at = encode_dt(profile.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE profiles SET
             username = ?2, display_name = ?3, bio = ?4, avatar_url = ?5,
             theme = ?6, social = ?7, hide_display_name = ?8,
             hide_username = ?9, hide_bio = ?10, updated_at = ?11
           WHERE profile_id = ?1",
          rusqlite::params![
            profile_id_str,
            username,
            display_name,
            bio,
            avatar_url,
            theme,
            social,
            hide_display_name,
            hide_username,
            hide_bio,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ViewStore impl ──────────────────────────────────────────────────────────

impl ViewStore for SqliteStore {
  type Error = Error;

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn create_profile(&self, input: NewProfile) -> Result<Profile> {
    // Sanitise the way the original input fields did, then validate.
    let username = normalize_username(&input.username);
    let normalized = NewProfile { username: username.clone(), ..input };
    normalized.validate().map_err(Error::Core)?;

    if self.username_exists(username.clone()).await? {
      return Err(Error::Core(viewtree_core::Error::UsernameTaken(username)));
    }

    let now = Utc::now();
    let profile = Profile {
      profile_id:        Uuid::new_v4(),
      username,
      display_name:      normalized.display_name,
      bio:               normalized.bio,
      avatar_url:        None,
      theme:             normalized.theme,
      social:            normalized.social,
      hide_display_name: false,
      hide_username:     false,
      hide_bio:          false,
      created_at:        now,
      updated_at:        now,
    };

    let profile_id_str = encode_uuid(profile.profile_id);
    let username_str = profile.username.clone();
    let display_name = profile.display_name.clone();
    let bio = profile.bio.clone();
    let theme = encode_theme(&profile.theme)?;
    let social = encode_social(&profile.social)?;
    let at_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (
             profile_id, username, display_name, bio, avatar_url, theme,
             social, hide_display_name, hide_username, hide_bio,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, 0, 0, 0, ?7, ?7)",
          rusqlite::params![
            profile_id_str,
            username_str,
            display_name,
            bio,
            theme,
            social,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    self
      .fetch_profile_where("profile_id = ?1", encode_uuid(id))
      .await
  }

  async fn get_profile_by_username(
    &self,
    username: &str,
  ) -> Result<Option<Profile>> {
    self
      .fetch_profile_where("username = ?1", username.to_owned())
      .await
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map([], profile_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn update_profile(
    &self,
    id: Uuid,
    patch: ProfilePatch,
  ) -> Result<Profile> {
    let mut profile = self
      .get_profile(id)
      .await?
      .ok_or(Error::Core(viewtree_core::Error::ProfileNotFound(id)))?;

    let old_username = profile.username.clone();
    patch.apply(&mut profile).map_err(Error::Core)?;

    if profile.username != old_username
      && self.username_exists(profile.username.clone()).await?
    {
      return Err(Error::Core(viewtree_core::Error::UsernameTaken(
        profile.username,
      )));
    }

    profile.updated_at = Utc::now();
    self.write_profile(&profile).await?;
    Ok(profile)
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  async fn create_view(&self, input: NewView) -> Result<View> {
    input.validate().map_err(Error::Core)?;

    // A failed minimum read degrades to "no existing views" rather than
    // blocking the insert.
    let min = match self.min_position(input.owner_id).await {
      Ok(min) => min,
      Err(e) => {
        tracing::warn!(owner_id = %input.owner_id, error = %e,
          "minimum-position read failed; defaulting to 0");
        None
      }
    };

    let min = if min.is_some_and(ordering::needs_rebase) {
      self.rebase_positions(input.owner_id).await?;
      self.min_position(input.owner_id).await?
    } else {
      min
    };

    let now = Utc::now();
    let view = View {
      view_id:     Uuid::new_v4(),
      owner_id:    input.owner_id,
      stem:        input.stem,
      statement:   input.statement,
      description: input.description,
      category:    input.category,
      position:    Some(ordering::initial_position(min)),
      pinned:      false,
      visibility:  input.visibility,
      created_at:  now,
      updated_at:  now,
    };

    self.insert_view(&view).await?;
    Ok(view)
  }

  async fn get_view(&self, id: Uuid) -> Result<Option<View>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawView> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {VIEW_COLUMNS} FROM views WHERE view_id = ?1"),
              rusqlite::params![id_str],
              view_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawView::into_view).transpose()
  }

  async fn list_views(
    &self,
    owner_id: Uuid,
    visibility: Option<Visibility>,
  ) -> Result<Vec<View>> {
    let owner_id_str = encode_uuid(owner_id);
    let visibility_str =
      visibility.map(encode_visibility).map(str::to_owned);

    let raws: Vec<RawView> = self
      .conn
      .call(move |conn| {
        // The ordered-read contract: position ascending with nulls last,
        // creation time descending as the tie-breaker.
        let rows = if let Some(vis) = visibility_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {VIEW_COLUMNS} FROM views
             WHERE owner_id = ?1 AND visibility = ?2
             ORDER BY position ASC NULLS LAST, created_at DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![owner_id_str, vis], view_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {VIEW_COLUMNS} FROM views
             WHERE owner_id = ?1
             ORDER BY position ASC NULLS LAST, created_at DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![owner_id_str], view_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawView::into_view).collect()
  }

  async fn update_view(
    &self,
    view_id: Uuid,
    owner_id: Uuid,
    patch: ViewPatch,
  ) -> Result<View> {
    let mut view = self
      .get_view(view_id)
      .await?
      .ok_or(Error::Core(viewtree_core::Error::ViewNotFound(view_id)))?;

    if view.owner_id != owner_id {
      return Err(Error::Core(viewtree_core::Error::NotOwner {
        view_id,
        owner_id,
      }));
    }

    patch.apply(&mut view).map_err(Error::Core)?;
    view.updated_at = Utc::now();

    let view_id_str = encode_uuid(view.view_id);
    let owner_id_str = encode_uuid(view.owner_id);
    let stem = view.stem.discriminant().to_owned();
    let custom_stem = match &view.stem {
      viewtree_core::view::Stem::Custom(text) => Some(text.clone()),
      _ => None,
    };
    let statement = view.statement.clone();
    let description = view.description.clone();
    let category = encode_category(view.category)?;
    let visibility = encode_visibility(view.visibility).to_owned();
    let updated_at = encode_dt(view.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE views SET
             stem = ?3, custom_stem = ?4, statement = ?5, description = ?6,
             category = ?7, visibility = ?8, updated_at = ?9
           WHERE view_id = ?1 AND owner_id = ?2",
          rusqlite::params![
            view_id_str,
            owner_id_str,
            stem,
            custom_stem,
            statement,
            description,
            category,
            visibility,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(view)
  }

  async fn delete_view(&self, view_id: Uuid, owner_id: Uuid) -> Result<bool> {
    let view_id_str = encode_uuid(view_id);
    let owner_id_str = encode_uuid(owner_id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM views WHERE view_id = ?1 AND owner_id = ?2",
          rusqlite::params![view_id_str, owner_id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn min_position(&self, owner_id: Uuid) -> Result<Option<i64>> {
    let owner_id_str = encode_uuid(owner_id);

    let min: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT position FROM views WHERE owner_id = ?1
               ORDER BY position ASC NULLS LAST LIMIT 1",
              rusqlite::params![owner_id_str],
              |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?
            .flatten(),
        )
      })
      .await?;

    Ok(min)
  }

  async fn reorder_views(
    &self,
    owner_id: Uuid,
    ordered_ids: &[Uuid],
  ) -> Result<ReorderReport> {
    let mut items = Vec::with_capacity(ordered_ids.len());

    // Independent updates; one failure never aborts the rest of the batch.
    for (view_id, position) in ordering::reorder_assignments(ordered_ids) {
      let outcome = match self.write_position(view_id, owner_id, position).await
      {
        Ok(true) => ReorderOutcome::Applied { position },
        Ok(false) => {
          tracing::warn!(%owner_id, %view_id,
            "reorder skipped a view not owned by the requester");
          ReorderOutcome::NotFound
        }
        Err(e) => {
          tracing::warn!(%owner_id, %view_id, error = %e,
            "reorder update failed; view keeps its stale position");
          ReorderOutcome::Failed { message: e.to_string() }
        }
      };
      items.push((view_id, outcome));
    }

    Ok(ReorderReport { items })
  }

  // ── Account removal ───────────────────────────────────────────────────────

  async fn delete_account(&self, owner_id: Uuid) -> Result<()> {
    let owner_id_str = encode_uuid(owner_id);

    self
      .conn
      .call(move |conn| {
        // Views reference the profile row, so they go first.
        conn.execute(
          "DELETE FROM views WHERE owner_id = ?1",
          rusqlite::params![owner_id_str],
        )?;
        conn.execute(
          "DELETE FROM profiles WHERE profile_id = ?1",
          rusqlite::params![owner_id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
