//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Structured fields (Theme,
//! SocialLinks) are stored as compact JSON. UUIDs are stored as hyphenated
//! lowercase strings. Booleans are SQLite integers.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use viewtree_core::{
  profile::{Profile, SocialLinks, Theme},
  view::{Stem, Category, View, Visibility},
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Visibility ──────────────────────────────────────────────────────────────

pub fn encode_visibility(v: Visibility) -> &'static str {
  match v {
    Visibility::Public => "public",
    Visibility::Private => "private",
  }
}

pub fn decode_visibility(s: &str) -> Result<Visibility> {
  match s {
    "public" => Ok(Visibility::Public),
    "private" => Ok(Visibility::Private),
    other => Err(Error::DateParse(format!("unknown visibility: {other:?}"))),
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

// Categories are stored under their serde snake_case names; reuse serde so
// the column value always matches the API wire form.

pub fn encode_category(c: Category) -> Result<String> {
  let v = serde_json::to_value(c)?;
  match v {
    serde_json::Value::String(s) => Ok(s),
    other => Err(Error::DateParse(format!("non-string category: {other}"))),
  }
}

pub fn decode_category(s: &str) -> Result<Category> {
  Ok(serde_json::from_value(serde_json::Value::String(s.to_owned()))?)
}

// ─── Theme / SocialLinks ─────────────────────────────────────────────────────

pub fn encode_theme(t: &Theme) -> Result<String> {
  Ok(serde_json::to_string(t)?)
}

pub fn decode_theme(s: &str) -> Result<Theme> { Ok(serde_json::from_str(s)?) }

pub fn encode_social(s: &SocialLinks) -> Result<String> {
  Ok(serde_json::to_string(s)?)
}

pub fn decode_social(s: &str) -> Result<SocialLinks> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `views` row.
pub struct RawView {
  pub view_id:     String,
  pub owner_id:    String,
  pub stem:        String,
  pub custom_stem: Option<String>,
  pub statement:   String,
  pub description: Option<String>,
  pub category:    String,
  pub position:    Option<i64>,
  pub pinned:      bool,
  pub visibility:  String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawView {
  pub fn into_view(self) -> Result<View> {
    Ok(View {
      view_id:     decode_uuid(&self.view_id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      stem:        Stem::from_parts(&self.stem, self.custom_stem)
        .map_err(Error::Core)?,
      statement:   self.statement,
      description: self.description,
      category:    decode_category(&self.category)?,
      position:    self.position,
      pinned:      self.pinned,
      visibility:  decode_visibility(&self.visibility)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id:        String,
  pub username:          String,
  pub display_name:      Option<String>,
  pub bio:               Option<String>,
  pub avatar_url:        Option<String>,
  pub theme:             String,
  pub social:            String,
  pub hide_display_name: bool,
  pub hide_username:     bool,
  pub hide_bio:          bool,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      profile_id:        decode_uuid(&self.profile_id)?,
      username:          self.username,
      display_name:      self.display_name,
      bio:               self.bio,
      avatar_url:        self.avatar_url,
      theme:             decode_theme(&self.theme)?,
      social:            decode_social(&self.social)?,
      hide_display_name: self.hide_display_name,
      hide_username:     self.hide_username,
      hide_bio:          self.hide_bio,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}
