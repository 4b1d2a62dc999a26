//! SQL schema for the ViewTree SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    profile_id        TEXT PRIMARY KEY,
    username          TEXT NOT NULL UNIQUE,
    display_name      TEXT,
    bio               TEXT,
    avatar_url        TEXT,            -- issued by external object storage
    theme             TEXT NOT NULL,   -- JSON Theme
    social            TEXT NOT NULL DEFAULT '{}',  -- JSON SocialLinks
    hide_display_name INTEGER NOT NULL DEFAULT 0,
    hide_username     INTEGER NOT NULL DEFAULT 0,
    hide_bio          INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at        TEXT NOT NULL
);

-- position is the sparse sort key maintained by the ordered collection
-- manager. Sparse and gappy on purpose: deletions never compact it, and
-- inserts only ever go below the current minimum.
CREATE TABLE IF NOT EXISTS views (
    view_id     TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL REFERENCES profiles(profile_id),
    stem        TEXT NOT NULL,   -- discriminant of Stem variant
    custom_stem TEXT,            -- text of Stem::Custom, else NULL
    statement   TEXT NOT NULL,
    description TEXT,
    category    TEXT NOT NULL,
    position    INTEGER,         -- NULL sorts last
    pinned      INTEGER NOT NULL DEFAULT 0,  -- legacy, unused for ordering
    visibility  TEXT NOT NULL,   -- 'public' | 'private'
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS views_owner_idx    ON views(owner_id);
CREATE INDEX IF NOT EXISTS views_position_idx ON views(owner_id, position);

PRAGMA user_version = 1;
";
