// ABOUTME: Active-routine progress tracking and calendar-day advancement
// ABOUTME: State machine that moves the cyclic day index forward across real-world days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Active-routine progress.
//!
//! The tracker is either idle (no routine being followed) or active. While
//! active, the day index advances lazily: completing a day records the date,
//! and the first evaluation on a later calendar day moves the index forward
//! one position (mod sequence length) and clears the completion mark. The
//! check is pure and side-effect-free, safe to re-run on every render tick
//! without debouncing; nothing needs to happen at midnight.

use crate::constants::storage_keys;
use crate::errors::{AppError, AppResult};
use crate::models::ActiveRoutineProgress;
use crate::storage::LocalStore;
use chrono::{Local, NaiveDate};
use tracing::warn;
use uuid::Uuid;

/// Advance the day index when the recorded completion date is strictly
/// before `today`. Returns `true` when an advancement happened.
///
/// A zero-length sequence must never reach this point for a persisted
/// routine; the index is floored to 0 and the integrity problem is logged
/// instead of masked.
pub fn advance_if_stale(
    progress: &mut ActiveRoutineProgress,
    sequence_len: usize,
    today: NaiveDate,
) -> bool {
    let Some(completed_on) = progress.last_completed else {
        return false;
    };
    if completed_on >= today {
        return false;
    }
    if sequence_len == 0 {
        warn!(
            routine_id = %progress.routine_id,
            "active routine has an empty sequence, flooring day index to 0"
        );
        progress.day_index = 0;
    } else {
        progress.day_index = (progress.day_index + 1) % sequence_len;
    }
    progress.last_completed = None;
    true
}

/// Tracks which routine is active and the user's position in it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    state: Option<ActiveRoutineProgress>,
}

impl ProgressTracker {
    /// Idle tracker with no active routine
    #[must_use]
    pub const fn new() -> Self {
        Self { state: None }
    }

    /// Whether a routine is currently active
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Current progress record, if a routine is active
    #[must_use]
    pub const fn progress(&self) -> Option<&ActiveRoutineProgress> {
        self.state.as_ref()
    }

    /// Activate a routine, starting at day 0 with no completion recorded
    pub fn start(&mut self, routine_id: Uuid) {
        self.state = Some(ActiveRoutineProgress::start(routine_id));
    }

    /// Exit the active routine, discarding progress unconditionally
    pub fn clear(&mut self) {
        self.state = None;
    }

    /// Manually set the day index (navigation/resync); clears any
    /// recorded completion date.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no routine is active.
    pub fn set_day_index(&mut self, index: usize) -> AppResult<()> {
        let progress = self
            .state
            .as_mut()
            .ok_or_else(|| AppError::invalid_state("no active routine"))?;
        progress.day_index = index;
        progress.last_completed = None;
        Ok(())
    }

    /// Mark the current day complete on the given calendar date.
    ///
    /// Does not advance the index; advancement happens on the first
    /// evaluation of a later calendar day.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no routine is active.
    pub fn mark_day_complete(&mut self, today: NaiveDate) -> AppResult<()> {
        let progress = self
            .state
            .as_mut()
            .ok_or_else(|| AppError::invalid_state("no active routine"))?;
        progress.last_completed = Some(today);
        Ok(())
    }

    /// Mark the current day complete using the local calendar date.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no routine is active.
    pub fn mark_day_complete_now(&mut self) -> AppResult<()> {
        self.mark_day_complete(Local::now().date_naive())
    }

    /// Evaluate the advancement rule and return the (possibly advanced)
    /// progress. Callers run this whenever state is read.
    pub fn evaluate(
        &mut self,
        sequence_len: usize,
        today: NaiveDate,
    ) -> Option<&ActiveRoutineProgress> {
        if let Some(progress) = self.state.as_mut() {
            advance_if_stale(progress, sequence_len, today);
        }
        self.state.as_ref()
    }

    /// Whether the current day was completed on the given date
    #[must_use]
    pub fn is_day_completed(&self, today: NaiveDate) -> bool {
        self.state
            .as_ref()
            .is_some_and(|p| p.is_day_completed(today))
    }

    /// Persist the tracker to local storage; an idle tracker removes the
    /// stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store rejects the write.
    pub fn persist(&self, store: &dyn LocalStore) -> AppResult<()> {
        match &self.state {
            Some(progress) => {
                let json = serde_json::to_string(progress)?;
                store.set_item(storage_keys::ACTIVE_ROUTINE_PROGRESS, &json)
            }
            None => store.remove_item(storage_keys::ACTIVE_ROUTINE_PROGRESS),
        }
    }

    /// Restore a tracker from local storage; missing or unparsable records
    /// yield an idle tracker (a stale cache must not break startup).
    #[must_use]
    pub fn restore(store: &dyn LocalStore) -> Self {
        let state = store
            .get_item(storage_keys::ACTIVE_ROUTINE_PROGRESS)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok());
        Self { state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Days;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_start_begins_at_day_zero() {
        let mut tracker = ProgressTracker::new();
        assert!(!tracker.is_active());
        tracker.start(Uuid::new_v4());
        let progress = tracker.progress().unwrap();
        assert_eq!(progress.day_index, 0);
        assert!(progress.last_completed.is_none());
    }

    #[test]
    fn test_yesterday_completion_advances_once() {
        let today = day("2025-03-10");
        let mut tracker = ProgressTracker::new();
        tracker.start(Uuid::new_v4());
        tracker.set_day_index(1).unwrap();
        tracker.mark_day_complete(today.checked_sub_days(Days::new(1)).unwrap()).unwrap();

        let progress = tracker.evaluate(5, today).unwrap();
        assert_eq!(progress.day_index, 2);
        assert!(progress.last_completed.is_none());

        // Re-evaluation is idempotent once the mark is cleared
        let progress = tracker.evaluate(5, today).unwrap();
        assert_eq!(progress.day_index, 2);
    }

    #[test]
    fn test_today_completion_does_not_advance() {
        let today = day("2025-03-10");
        let mut tracker = ProgressTracker::new();
        tracker.start(Uuid::new_v4());
        tracker.mark_day_complete(today).unwrap();

        let progress = tracker.evaluate(5, today).unwrap();
        assert_eq!(progress.day_index, 0);
        assert_eq!(progress.last_completed, Some(today));
        assert!(tracker.is_day_completed(today));
    }

    #[test]
    fn test_wraparound() {
        let today = day("2025-03-10");
        let mut tracker = ProgressTracker::new();
        tracker.start(Uuid::new_v4());
        tracker.set_day_index(2).unwrap();
        tracker.mark_day_complete(day("2025-03-09")).unwrap();

        let progress = tracker.evaluate(3, today).unwrap();
        assert_eq!(progress.day_index, 0);
    }

    #[test]
    fn test_empty_sequence_floors_to_zero() {
        let today = day("2025-03-10");
        let mut tracker = ProgressTracker::new();
        tracker.start(Uuid::new_v4());
        tracker.set_day_index(4).unwrap();
        tracker.mark_day_complete(day("2025-03-09")).unwrap();

        let progress = tracker.evaluate(0, today).unwrap();
        assert_eq!(progress.day_index, 0);
        assert!(progress.last_completed.is_none());
    }

    #[test]
    fn test_no_completion_never_advances() {
        let today = day("2025-03-10");
        let mut tracker = ProgressTracker::new();
        tracker.start(Uuid::new_v4());
        tracker.set_day_index(1).unwrap();

        let progress = tracker.evaluate(5, today).unwrap();
        assert_eq!(progress.day_index, 1);
    }

    #[test]
    fn test_set_day_index_clears_completion() {
        let today = day("2025-03-10");
        let mut tracker = ProgressTracker::new();
        tracker.start(Uuid::new_v4());
        tracker.mark_day_complete(today).unwrap();
        tracker.set_day_index(3).unwrap();
        assert!(!tracker.is_day_completed(today));
    }

    #[test]
    fn test_operations_invalid_when_idle() {
        let mut tracker = ProgressTracker::new();
        assert!(tracker.mark_day_complete(day("2025-03-10")).is_err());
        assert!(tracker.set_day_index(1).is_err());
        assert!(tracker.evaluate(5, day("2025-03-10")).is_none());
    }

    #[test]
    fn test_clear_discards_progress() {
        let mut tracker = ProgressTracker::new();
        tracker.start(Uuid::new_v4());
        tracker.clear();
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_persist_and_restore() {
        let store = MemoryStore::new();
        let mut tracker = ProgressTracker::new();
        tracker.start(Uuid::new_v4());
        tracker.set_day_index(2).unwrap();
        tracker.persist(&store).unwrap();

        let restored = ProgressTracker::restore(&store);
        assert_eq!(restored, tracker);

        tracker.clear();
        tracker.persist(&store).unwrap();
        assert!(!ProgressTracker::restore(&store).is_active());
    }
}
