// ABOUTME: Day-entry construction and the in-memory routine draft store
// ABOUTME: Builds normalized sequence items and supports add/remove/reorder while editing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Routine drafting.
//!
//! A [`RoutineDraft`] is the ordered day list being edited. Mutations are
//! purely in-memory; persistence is a separate explicit step through
//! [`crate::services::routines::RoutineService`]. Drafts can be cached in
//! local storage for guest/offline editing.

use crate::errors::{AppError, AppResult};
use crate::models::{SequenceItem, SequenceItemKind, WorkoutSnapshot, REST_DAY_NAME};
use crate::storage::LocalStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw input for one day of a routine
#[derive(Debug, Clone, PartialEq)]
pub enum DayInput {
    /// A rest day
    Rest,
    /// A workout day referencing a saved workout (or unsaved draft) snapshot
    Workout(WorkoutSnapshot),
}

/// Construct a normalized day entry from raw input.
///
/// The generated id is unique within the draft's lifetime; no global
/// uniqueness is required.
#[must_use]
pub fn sequence_item(input: DayInput) -> SequenceItem {
    match input {
        DayInput::Rest => SequenceItem {
            id: Uuid::new_v4(),
            kind: SequenceItemKind::Rest,
            name: REST_DAY_NAME.into(),
            workout: None,
        },
        DayInput::Workout(snapshot) => SequenceItem {
            id: Uuid::new_v4(),
            kind: SequenceItemKind::Workout,
            name: snapshot.name.clone(),
            workout: Some(snapshot),
        },
    }
}

/// Direction for a single-position reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Swap with the previous day
    Earlier,
    /// Swap with the next day
    Later,
}

impl MoveDirection {
    /// Signed index offset of the swap target
    #[must_use]
    pub const fn offset(self) -> isize {
        match self {
            Self::Earlier => -1,
            Self::Later => 1,
        }
    }
}

/// Ordered list of day entries being edited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutineDraft {
    sequence: Vec<SequenceItem>,
}

impl RoutineDraft {
    /// Empty draft
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sequence: Vec::new(),
        }
    }

    /// Draft seeded from an existing routine's sequence (edit flow)
    #[must_use]
    pub const fn from_sequence(sequence: Vec<SequenceItem>) -> Self {
        Self { sequence }
    }

    /// Append a day to the end of the sequence; returns the new entry's id
    pub fn add_day(&mut self, input: DayInput) -> Uuid {
        let item = sequence_item(input);
        let id = item.id;
        self.sequence.push(item);
        id
    }

    /// Remove the first day with the matching id; no-op if absent
    pub fn remove_day(&mut self, id: Uuid) {
        if let Some(pos) = self.sequence.iter().position(|item| item.id == id) {
            self.sequence.remove(pos);
        }
    }

    /// Swap the day at `index` with its neighbor in the given direction.
    ///
    /// Returns `false` (a no-op, not an error) when either index is out of
    /// bounds.
    pub fn reorder(&mut self, index: usize, direction: MoveDirection) -> bool {
        if index >= self.sequence.len() {
            return false;
        }
        let Some(target) = index.checked_add_signed(direction.offset()) else {
            return false;
        };
        if target >= self.sequence.len() {
            return false;
        }
        self.sequence.swap(index, target);
        true
    }

    /// The current day entries, in order
    #[must_use]
    pub fn sequence(&self) -> &[SequenceItem] {
        &self.sequence
    }

    /// Consume the draft, yielding the sequence for persistence
    #[must_use]
    pub fn into_sequence(self) -> Vec<SequenceItem> {
        self.sequence
    }

    /// Number of days in the draft
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the draft has no days yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Cache the draft in local storage (best-effort guest/offline fallback).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store rejects the write.
    pub fn save_cached(&self, store: &dyn LocalStore, key: &str) -> AppResult<()> {
        let json = serde_json::to_string(self)?;
        store.set_item(key, &json)
    }

    /// Load a previously cached draft, if any.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` when a cached value exists but does not
    /// parse.
    pub fn load_cached(store: &dyn LocalStore, key: &str) -> AppResult<Option<Self>> {
        match store.get_item(key)? {
            Some(json) => {
                let draft = serde_json::from_str(&json).map_err(AppError::from)?;
                Ok(Some(draft))
            }
            None => Ok(None),
        }
    }
}
