//! Entity identifiers.
//!
//! Identifiers are epoch milliseconds at creation time, bumped past the
//! largest identifier already stored so two creates in the same millisecond
//! never collide.

use std::time::{SystemTime, UNIX_EPOCH};

/// Integer identifier shared by all entity families.
pub type EntityId = i64;

/// Placeholder identifier carried by entities that were never persisted.
pub const UNSAVED_ID: EntityId = 0;

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Picks the identifier for a new record.
///
/// Returns `max(now_ms, max(existing) + 1)`, and never `UNSAVED_ID`.
pub fn next_entity_id<I>(now_ms: i64, existing: I) -> EntityId
where
    I: IntoIterator<Item = EntityId>,
{
    let floor = existing
        .into_iter()
        .max()
        .map_or(UNSAVED_ID + 1, |max| max.saturating_add(1));
    now_ms.max(floor)
}

#[cfg(test)]
mod tests {
    use super::{next_entity_id, UNSAVED_ID};

    #[test]
    fn uses_clock_when_ahead_of_existing_ids() {
        assert_eq!(next_entity_id(1_000, [1, 5, 999]), 1_000);
    }

    #[test]
    fn bumps_past_existing_ids_within_same_millisecond() {
        assert_eq!(next_entity_id(1_000, [1_000]), 1_001);
        assert_eq!(next_entity_id(1_000, [1_000, 1_001]), 1_002);
    }

    #[test]
    fn never_returns_unsaved_placeholder() {
        assert_ne!(next_entity_id(0, std::iter::empty()), UNSAVED_ID);
    }
}
