// ABOUTME: Core data model for routines, sequences, workouts, and progress
// ABOUTME: Serde-serializable structures shared by the draft store, scheduler, and persistence layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Core data structures.
//!
//! A [`Routine`] is a named, ordered, cyclic schedule of days. Each day is a
//! [`SequenceItem`]: either a rest day or a denormalized snapshot of a workout.
//! Once a routine is persisted, every embedded workout is a routine-private
//! copy, never a live reference to the template it was built from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A planned set: target reps, weight, and/or duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SetTarget {
    /// Target repetitions, if rep-based
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Target weight in kilograms, if loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Target duration in seconds, if time-based
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
}

/// One exercise inside a workout, with its planned sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Backend exercise row id; `None` for a draft not yet resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Display name, also the resolution key in the exercise catalog
    pub name: String,
    /// Planned number of sets
    pub sets: u32,
    /// Default target reps applied when a set has no explicit target
    pub reps: u32,
    /// Per-set targets; may be shorter than `sets`, remaining sets use `reps`
    #[serde(default)]
    pub set_targets: Vec<SetTarget>,
}

impl Exercise {
    /// Convenience constructor for a rep-based exercise with uniform sets
    #[must_use]
    pub fn new(name: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            sets,
            reps,
            set_targets: Vec::new(),
        }
    }
}

/// Denormalized workout snapshot embedded in a sequence item.
///
/// This is a copy, not a live reference: editing the original template after
/// the snapshot was taken must not change the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSnapshot {
    /// Backend workout row id; `None` for an unsaved draft
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Workout display name
    pub name: String,
    /// Embedded exercise list
    pub exercises: Vec<Exercise>,
}

/// Kind of day in a routine sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceItemKind {
    /// Rest day with no actionable content
    Rest,
    /// Workout day with an embedded workout snapshot
    Workout,
}

impl SequenceItemKind {
    /// Convert to the stored string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Workout => "workout",
        }
    }

    /// Parse from the stored string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "workout" => Self::Workout,
            _ => Self::Rest,
        }
    }
}

/// Display name used for rest days
pub const REST_DAY_NAME: &str = "Rest";

/// One day in a routine: a rest day or a workout snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceItem {
    /// Identifier unique within the draft's lifetime
    pub id: Uuid,
    /// Day kind
    #[serde(rename = "type")]
    pub kind: SequenceItemKind,
    /// Display name: `"Rest"` for rest days, otherwise the workout name
    pub name: String,
    /// Present only for workout days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout: Option<WorkoutSnapshot>,
}

impl SequenceItem {
    /// Whether this day is a rest day
    #[must_use]
    pub const fn is_rest(&self) -> bool {
        matches!(self.kind, SequenceItemKind::Rest)
    }
}

/// A named, ordered, cyclic schedule of days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    /// Backend routine row id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// Ordered day entries; order is the training calendar
    pub sequence: Vec<SequenceItem>,
    /// Whether a per-day copy failed during the last update and the routine
    /// still references days that were not rewritten to private copies
    #[serde(default)]
    pub needs_repair: bool,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

/// A standalone saved workout: shared template or routine-private copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWorkout {
    /// Backend workout row id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// When set, this workout is a private copy owned by that routine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<Uuid>,
    /// Exercises with planned sets
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

impl SavedWorkout {
    /// Take a denormalized snapshot for embedding in a sequence item
    #[must_use]
    pub fn snapshot(&self) -> WorkoutSnapshot {
        WorkoutSnapshot {
            id: Some(self.id),
            name: self.name.clone(),
            exercises: self.exercises.clone(),
        }
    }
}

/// Ephemeral record of a user's position in an active routine.
///
/// One per user at a time; owned by the session layer and kept client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRoutineProgress {
    /// Routine currently being followed
    pub routine_id: Uuid,
    /// Zero-based cyclic offset into the routine's sequence
    pub day_index: usize,
    /// Calendar date (day precision, local) on which the current day was
    /// marked complete; cleared when the index advances
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<NaiveDate>,
}

impl ActiveRoutineProgress {
    /// Fresh progress at the start of a routine
    #[must_use]
    pub const fn start(routine_id: Uuid) -> Self {
        Self {
            routine_id,
            day_index: 0,
            last_completed: None,
        }
    }

    /// Whether the current day was completed on the given calendar date
    #[must_use]
    pub fn is_day_completed(&self, today: NaiveDate) -> bool {
        self.last_completed == Some(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(SequenceItemKind::parse("rest"), SequenceItemKind::Rest);
        assert_eq!(
            SequenceItemKind::parse("workout"),
            SequenceItemKind::Workout
        );
        assert_eq!(SequenceItemKind::Workout.as_str(), "workout");
        // Unknown values degrade to rest rather than failing a whole sequence
        assert_eq!(SequenceItemKind::parse("garbage"), SequenceItemKind::Rest);
    }

    #[test]
    fn test_sequence_item_serializes_kind_as_type() {
        let item = SequenceItem {
            id: Uuid::new_v4(),
            kind: SequenceItemKind::Rest,
            name: REST_DAY_NAME.into(),
            workout: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "rest");
        assert!(value.get("workout").is_none());
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let workout = SavedWorkout {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Push".into(),
            routine_id: None,
            exercises: vec![Exercise::new("Bench Press", 3, 8)],
            created_at: Utc::now(),
        };
        let snap = workout.snapshot();
        assert_eq!(snap.id, Some(workout.id));
        assert_eq!(snap.exercises, workout.exercises);
    }
}
