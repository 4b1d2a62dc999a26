//! View types — the unit of content in a ViewTree collection.
//!
//! A view is a short structured statement ("I believe…", "I support…") with a
//! category, an optional longer description, and a visibility flag. Views are
//! ordered within their owner's collection by a sparse integer `position` key
//! (see [`crate::ordering`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Maximum length of a view's statement text.
pub const STATEMENT_MAX: usize = 200;
/// Maximum length of a view's optional description.
pub const DESCRIPTION_MAX: usize = 1000;
/// Maximum length of a custom stem.
pub const CUSTOM_STEM_MAX: usize = 12;

// ─── Stem ────────────────────────────────────────────────────────────────────

/// The sentence opener a statement hangs off of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Stem {
  IBelieve,
  ISupport,
  IOppose,
  UncertainAbout,
  /// A user-written opener; at most [`CUSTOM_STEM_MAX`] characters.
  Custom(String),
}

impl Stem {
  /// The discriminant string stored in the `stem` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::IBelieve => "i_believe",
      Self::ISupport => "i_support",
      Self::IOppose => "i_oppose",
      Self::UncertainAbout => "uncertain_about",
      Self::Custom(_) => "custom",
    }
  }

  /// Rebuild from the discriminant and the `custom_stem` column.
  pub fn from_parts(discriminant: &str, custom: Option<String>) -> Result<Self> {
    match discriminant {
      "i_believe" => Ok(Self::IBelieve),
      "i_support" => Ok(Self::ISupport),
      "i_oppose" => Ok(Self::IOppose),
      "uncertain_about" => Ok(Self::UncertainAbout),
      "custom" => Ok(Self::Custom(custom.unwrap_or_default())),
      other => Err(Error::UnknownStem(other.to_owned())),
    }
  }

  /// The display phrase shown before the statement.
  pub fn phrase(&self) -> &str {
    match self {
      Self::IBelieve => "I believe",
      Self::ISupport => "I support",
      Self::IOppose => "I oppose",
      Self::UncertainAbout => "I'm uncertain about",
      Self::Custom(text) => text,
    }
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// The topic bucket a view belongs to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::EnumIter,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "title_case")]
pub enum Category {
  Politics,
  Religion,
  Economics,
  SocialIssues,
  Technology,
  Environment,
  Philosophy,
  Science,
  Health,
  Education,
  Other,
}

// ─── Visibility ──────────────────────────────────────────────────────────────

/// Whether a view appears on the owner's public page.
/// Has no effect on ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
  Public,
  Private,
}

impl Visibility {
  pub fn is_public(self) -> bool { matches!(self, Self::Public) }
}

// ─── View ────────────────────────────────────────────────────────────────────

/// A single user-authored statement record.
///
/// `position` is the sparse sort key maintained by the ordered collection
/// manager: ascending, not contiguous, `None` sorts last. `pinned` is a
/// legacy flag kept for wire compatibility; it is never consulted for
/// ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
  pub view_id:     Uuid,
  pub owner_id:    Uuid,
  pub stem:        Stem,
  pub statement:   String,
  pub description: Option<String>,
  pub category:    Category,
  pub position:    Option<i64>,
  pub pinned:      bool,
  pub visibility:  Visibility,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

// ─── NewView ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ViewStore::create_view`].
/// `view_id`, `position`, and both timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewView {
  pub owner_id:    Uuid,
  pub stem:        Stem,
  pub statement:   String,
  pub description: Option<String>,
  pub category:    Category,
  pub visibility:  Visibility,
}

impl NewView {
  /// Convenience constructor with public visibility and no description.
  pub fn new(owner_id: Uuid, stem: Stem, statement: impl Into<String>) -> Self {
    Self {
      owner_id,
      stem,
      statement: statement.into(),
      description: None,
      category: Category::Other,
      visibility: Visibility::Public,
    }
  }

  /// Enforce the character limits of the content fields.
  pub fn validate(&self) -> Result<()> {
    validate_content(&self.stem, &self.statement, self.description.as_deref())
  }
}

// ─── ViewPatch ───────────────────────────────────────────────────────────────

/// Partial update for a view. `None` fields are left untouched;
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewPatch {
  pub stem:        Option<Stem>,
  pub statement:   Option<String>,
  #[serde(default, with = "double_option")]
  pub description: Option<Option<String>>,
  pub category:    Option<Category>,
  pub visibility:  Option<Visibility>,
}

impl ViewPatch {
  /// Apply to an existing view, validating the result.
  /// Does not touch `position`; ordering is owned by the reorder path.
  pub fn apply(self, view: &mut View) -> Result<()> {
    if let Some(stem) = self.stem {
      view.stem = stem;
    }
    if let Some(statement) = self.statement {
      view.statement = statement;
    }
    if let Some(description) = self.description {
      view.description = description;
    }
    if let Some(category) = self.category {
      view.category = category;
    }
    if let Some(visibility) = self.visibility {
      view.visibility = visibility;
    }
    validate_content(&view.stem, &view.statement, view.description.as_deref())
  }
}

fn validate_content(
  stem: &Stem,
  statement: &str,
  description: Option<&str>,
) -> Result<()> {
  if let Stem::Custom(text) = stem {
    let len = text.chars().count();
    if len == 0 || len > CUSTOM_STEM_MAX {
      return Err(Error::CustomStemLength { len, limit: CUSTOM_STEM_MAX });
    }
  }

  let len = statement.chars().count();
  if len == 0 || len > STATEMENT_MAX {
    return Err(Error::StatementLength { len, limit: STATEMENT_MAX });
  }

  if let Some(desc) = description {
    let len = desc.chars().count();
    if len > DESCRIPTION_MAX {
      return Err(Error::DescriptionLength { len, limit: DESCRIPTION_MAX });
    }
  }

  Ok(())
}

/// Serde helper distinguishing "absent" from "explicitly null" in patches.
pub(crate) mod double_option {
  use serde::{Deserialize, Deserializer};

  pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
  where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
  {
    Option::<T>::deserialize(de).map(Some)
  }
}
