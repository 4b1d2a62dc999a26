//! Ordered collection manager — position assignment and reconciliation for a
//! user's view collection.
//!
//! Views carry a sparse signed-integer `position` key. Listings sort by
//! `position` ascending with nulls last, then `created_at` descending as the
//! tie-breaker. New views are *prepended*: each one takes a position strictly
//! below the current minimum, so the default ordering is most-recent-first
//! without touching any existing row. A drag-and-drop reorder then rewrites
//! every position to the zero-based index of the submitted id sequence.
//!
//! Both steps are pure functions of their inputs; the store supplies the
//! current minimum and persists the resulting assignments.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Positions sinking below this floor trigger a rebase to `0..N-1` on the
/// next insertion. Repeated prepending decrements the minimum by one each
/// time, so this bound is unreachable in normal use but keeps the key well
/// clear of `i64::MIN`.
pub const REBASE_FLOOR: i64 = -1_000_000_000;

/// Position for a view inserted into a collection whose minimum existing
/// position is `min_existing` (`None` when the collection is empty or every
/// position is null). The result sorts strictly before all existing numeric
/// positions.
pub fn initial_position(min_existing: Option<i64>) -> i64 {
  match min_existing {
    Some(min) => min.saturating_sub(1),
    None => 0,
  }
}

/// Map each id in a user-submitted display order to its zero-based index.
/// Committing these assignments makes an ascending-position read reproduce
/// the submitted sequence exactly.
pub fn reorder_assignments(ordered_ids: &[Uuid]) -> Vec<(Uuid, i64)> {
  ordered_ids
    .iter()
    .enumerate()
    .map(|(index, id)| (*id, index as i64))
    .collect()
}

/// Whether the collection's minimum position has decayed far enough that the
/// store should rebase positions to `0..N-1`.
pub fn needs_rebase(min_position: i64) -> bool { min_position < REBASE_FLOOR }

// ─── Batch result ────────────────────────────────────────────────────────────

/// Outcome of a single position update within a reorder batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReorderOutcome {
  /// The position was written.
  Applied { position: i64 },
  /// No view with this id exists under the requesting owner. Ids belonging
  /// to other owners land here: updates are scoped by id AND owner.
  NotFound,
  /// The update failed; the view keeps its previous position.
  Failed { message: String },
}

impl ReorderOutcome {
  pub fn is_applied(&self) -> bool { matches!(self, Self::Applied { .. }) }
}

/// Per-item results of a reorder commit. The batch is not transactional;
/// callers inspect this to decide whether to retry or alert the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderReport {
  pub items: Vec<(Uuid, ReorderOutcome)>,
}

impl ReorderReport {
  pub fn all_applied(&self) -> bool {
    self.items.iter().all(|(_, o)| o.is_applied())
  }

  pub fn applied_count(&self) -> usize {
    self.items.iter().filter(|(_, o)| o.is_applied()).count()
  }
}
