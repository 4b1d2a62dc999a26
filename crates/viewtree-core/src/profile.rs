//! Profile — the owner identity a view collection hangs off of.
//!
//! Authentication is external; this crate only models the public-facing
//! profile record (username, display name, bio, theme, social links) and the
//! validation rules the original product enforced on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Username length bounds (inclusive).
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;
/// Maximum length of the profile bio.
pub const BIO_MAX: usize = 160;

// ─── Theme ───────────────────────────────────────────────────────────────────

/// Page theme colors and font, chosen by the owner.
/// Values are opaque CSS color strings; rendering is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
  pub background: String,
  pub card:       String,
  pub accent:     String,
  pub text:       String,
  pub font:       String,
}

impl Default for Theme {
  fn default() -> Self {
    Self {
      background: "#020617".into(),
      card:       "#020617".into(),
      accent:     "#4b5563".into(),
      text:       "#f9fafb".into(),
      font:       "sans".into(),
    }
  }
}

// ─── Social links ────────────────────────────────────────────────────────────

/// Optional per-platform links shown on the public page.
///
/// Handles are bare (no URL); `website` is a full URL and the only field
/// allowed to contain one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
  pub instagram: Option<String>,
  pub twitter:   Option<String>,
  pub youtube:   Option<String>,
  pub spotify:   Option<String>,
  pub website:   Option<String>,
}

impl SocialLinks {
  /// Whitelist check: handles are `[A-Za-z0-9._-]`, 1-64 chars; the website
  /// must be an absolute `http(s)` URL.
  pub fn validate(&self) -> Result<()> {
    for (platform, value) in [
      ("instagram", &self.instagram),
      ("twitter", &self.twitter),
      ("youtube", &self.youtube),
      ("spotify", &self.spotify),
    ] {
      if let Some(handle) = value
        && !is_valid_handle(handle)
      {
        return Err(Error::InvalidSocialLink {
          platform: platform.to_owned(),
          value:    handle.clone(),
        });
      }
    }

    if let Some(url) = &self.website
      && !(url.starts_with("https://") || url.starts_with("http://"))
    {
      return Err(Error::InvalidSocialLink {
        platform: "website".to_owned(),
        value:    url.clone(),
      });
    }

    Ok(())
  }

  pub fn is_empty(&self) -> bool {
    self.instagram.is_none()
      && self.twitter.is_none()
      && self.youtube.is_none()
      && self.spotify.is_none()
      && self.website.is_none()
  }
}

fn is_valid_handle(handle: &str) -> bool {
  let len = handle.chars().count();
  (1..=64).contains(&len)
    && handle
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

// ─── Username ────────────────────────────────────────────────────────────────

/// Strip a raw username down to its allowed charset, as the original input
/// fields did on every keystroke: lowercase, then drop anything outside
/// `[a-z0-9-]`.
pub fn normalize_username(raw: &str) -> String {
  raw
    .to_lowercase()
    .chars()
    .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
    .collect()
}

/// Check an already-normalized username against the length and charset rules.
pub fn validate_username(username: &str) -> Result<()> {
  let len = username.chars().count();
  let charset_ok = username
    .chars()
    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

  if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) || !charset_ok {
    return Err(Error::InvalidUsername(username.to_owned()));
  }
  Ok(())
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// A user's public-facing identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id:        Uuid,
  pub username:          String,
  pub display_name:      Option<String>,
  pub bio:               Option<String>,
  /// Public URL issued by external object storage; opaque to this service.
  pub avatar_url:        Option<String>,
  pub theme:             Theme,
  pub social:            SocialLinks,
  pub hide_display_name: bool,
  pub hide_username:     bool,
  pub hide_bio:          bool,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

impl Profile {
  /// The public-page rendition: fields the owner chose to hide are blanked
  /// before the record leaves the service.
  pub fn redacted(mut self) -> Self {
    if self.hide_display_name {
      self.display_name = None;
    }
    if self.hide_bio {
      self.bio = None;
    }
    self
  }
}

// ─── NewProfile ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::ViewStore::create_profile`].
/// `profile_id` and both timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub username:     String,
  pub display_name: Option<String>,
  pub bio:          Option<String>,
  pub theme:        Theme,
  pub social:       SocialLinks,
}

impl NewProfile {
  pub fn new(username: impl Into<String>) -> Self {
    Self {
      username:     username.into(),
      display_name: None,
      bio:          None,
      theme:        Theme::default(),
      social:       SocialLinks::default(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate_username(&self.username)?;
    validate_bio(self.bio.as_deref())?;
    self.social.validate()
  }
}

// ─── ProfilePatch ────────────────────────────────────────────────────────────

/// Partial update for a profile. The username is immutable through this
/// path only insofar as the original exposed it in settings; when present it
/// is re-validated and uniqueness is re-checked by the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
  pub username:          Option<String>,
  #[serde(default, with = "crate::view::double_option")]
  pub display_name:      Option<Option<String>>,
  #[serde(default, with = "crate::view::double_option")]
  pub bio:               Option<Option<String>>,
  #[serde(default, with = "crate::view::double_option")]
  pub avatar_url:        Option<Option<String>>,
  pub theme:             Option<Theme>,
  pub social:            Option<SocialLinks>,
  pub hide_display_name: Option<bool>,
  pub hide_username:     Option<bool>,
  pub hide_bio:          Option<bool>,
}

impl ProfilePatch {
  /// Apply to an existing profile, validating the result.
  pub fn apply(self, profile: &mut Profile) -> Result<()> {
    if let Some(username) = self.username {
      profile.username = username;
    }
    if let Some(display_name) = self.display_name {
      profile.display_name = display_name;
    }
    if let Some(bio) = self.bio {
      profile.bio = bio;
    }
    if let Some(avatar_url) = self.avatar_url {
      profile.avatar_url = avatar_url;
    }
    if let Some(theme) = self.theme {
      profile.theme = theme;
    }
    if let Some(social) = self.social {
      profile.social = social;
    }
    if let Some(hide) = self.hide_display_name {
      profile.hide_display_name = hide;
    }
    if let Some(hide) = self.hide_username {
      profile.hide_username = hide;
    }
    if let Some(hide) = self.hide_bio {
      profile.hide_bio = hide;
    }

    validate_username(&profile.username)?;
    validate_bio(profile.bio.as_deref())?;
    profile.social.validate()
  }
}

fn validate_bio(bio: Option<&str>) -> Result<()> {
  if let Some(bio) = bio {
    let len = bio.chars().count();
    if len > BIO_MAX {
      return Err(Error::BioLength { len, limit: BIO_MAX });
    }
  }
  Ok(())
}
