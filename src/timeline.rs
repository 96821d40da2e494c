// ABOUTME: Forward projection of upcoming days from a routine sequence
// ABOUTME: Bounded look-ahead that surfaces today plus upcoming workout days, skipping rest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Timeline projection.
//!
//! Derives a bounded forward view of a cyclic routine: today's day is always
//! shown (even a rest day), later rest days are skipped because they carry no
//! actionable content, and each position in the sequence appears at most once
//! per projection. The walk is capped by a per-mode item count and a hard
//! day bound so an all-rest sequence still terminates.

use crate::models::SequenceItem;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Look-ahead policy for the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimelineMode {
    /// Up to the next three workout days, scanning up to 30 days out
    #[default]
    #[serde(rename = "next_3")]
    Next3,
    /// Up to the next seven workout days, scanning up to 30 days out
    #[serde(rename = "next_7")]
    Next7,
    /// The coming seven calendar days only
    #[serde(rename = "week")]
    Week,
}

impl TimelineMode {
    /// Maximum number of items the projection may return
    #[must_use]
    pub const fn count_limit(self) -> usize {
        match self {
            Self::Next3 => 3,
            Self::Next7 | Self::Week => 7,
        }
    }

    /// Hard bound on calendar days scanned; guarantees termination for a
    /// pathological all-rest sequence
    #[must_use]
    pub const fn day_limit(self) -> usize {
        match self {
            Self::Next3 | Self::Next7 => 30,
            Self::Week => 7,
        }
    }

    /// Convert to the stored string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next3 => "next_3",
            Self::Next7 => "next_7",
            Self::Week => "week",
        }
    }

    /// Parse from the stored string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "next_7" => Self::Next7,
            "week" => Self::Week,
            _ => Self::Next3,
        }
    }
}

/// A projected day, annotated so callers can act on it without re-deriving
/// position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedDay {
    /// The day entry
    pub item: SequenceItem,
    /// Index of the entry in the full sequence
    pub original_index: usize,
    /// Absolute calendar date (today + offset)
    pub date: NaiveDate,
}

/// Project the upcoming days of a cyclic sequence.
///
/// Walks forward from `day_index`, wrapping modulo the sequence length.
/// The day at offset 0 is included unconditionally; later days only when
/// they are workout days whose sequence position has not been emitted yet.
/// Returns an empty list for an empty sequence.
#[must_use]
pub fn project_timeline(
    sequence: &[SequenceItem],
    day_index: usize,
    mode: TimelineMode,
    today: NaiveDate,
) -> Vec<ProjectedDay> {
    if sequence.is_empty() {
        return Vec::new();
    }

    let mut result: Vec<ProjectedDay> = Vec::new();
    let mut seen = vec![false; sequence.len()];

    for offset in 0..mode.day_limit() {
        if result.len() >= mode.count_limit() {
            break;
        }
        let index = (day_index + offset) % sequence.len();
        let item = &sequence[index];

        let include = if offset == 0 {
            true
        } else {
            !item.is_rest() && !seen[index]
        };
        if !include {
            continue;
        }
        seen[index] = true;

        let Some(date) = today.checked_add_days(Days::new(offset as u64)) else {
            break;
        };
        result.push(ProjectedDay {
            item: item.clone(),
            original_index: index,
            date,
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SequenceItemKind, WorkoutSnapshot, REST_DAY_NAME};
    use uuid::Uuid;

    fn workout_day(name: &str) -> SequenceItem {
        SequenceItem {
            id: Uuid::new_v4(),
            kind: SequenceItemKind::Workout,
            name: name.into(),
            workout: Some(WorkoutSnapshot {
                id: Some(Uuid::new_v4()),
                name: name.into(),
                exercises: Vec::new(),
            }),
        }
    }

    fn rest_day() -> SequenceItem {
        SequenceItem {
            id: Uuid::new_v4(),
            kind: SequenceItemKind::Rest,
            name: REST_DAY_NAME.into(),
            workout: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_mode_limits() {
        assert_eq!(TimelineMode::Next3.count_limit(), 3);
        assert_eq!(TimelineMode::Next3.day_limit(), 30);
        assert_eq!(TimelineMode::Week.count_limit(), 7);
        assert_eq!(TimelineMode::Week.day_limit(), 7);
        assert_eq!(TimelineMode::parse("week"), TimelineMode::Week);
        assert_eq!(TimelineMode::parse("next_7").as_str(), "next_7");
    }

    #[test]
    fn test_rest_days_skipped_today_included() {
        let today = day("2025-03-10");
        let sequence = vec![workout_day("A"), rest_day(), rest_day(), workout_day("B")];

        let projected = project_timeline(&sequence, 0, TimelineMode::Next3, today);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].item.name, "A");
        assert_eq!(projected[0].original_index, 0);
        assert_eq!(projected[0].date, today);
        assert_eq!(projected[1].item.name, "B");
        assert_eq!(projected[1].original_index, 3);
        assert_eq!(projected[1].date, day("2025-03-13"));
    }

    #[test]
    fn test_today_rest_day_is_surfaced() {
        let today = day("2025-03-10");
        let sequence = vec![rest_day(), workout_day("A")];

        let projected = project_timeline(&sequence, 0, TimelineMode::Next3, today);
        assert_eq!(projected.len(), 2);
        assert!(projected[0].item.is_rest());
        assert_eq!(projected[1].item.name, "A");
    }

    #[test]
    fn test_all_rest_sequence_terminates() {
        let today = day("2025-03-10");
        let sequence = vec![rest_day()];

        let projected = project_timeline(&sequence, 0, TimelineMode::Next3, today);
        assert_eq!(projected.len(), 1);
        assert!(projected[0].item.is_rest());
    }

    #[test]
    fn test_wrapping_from_late_index() {
        let today = day("2025-03-10");
        let sequence = vec![workout_day("A"), rest_day(), workout_day("C")];

        let projected = project_timeline(&sequence, 2, TimelineMode::Next3, today);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].item.name, "C");
        assert_eq!(projected[0].original_index, 2);
        // Wraps to index 0 on the next calendar day
        assert_eq!(projected[1].item.name, "A");
        assert_eq!(projected[1].original_index, 0);
        assert_eq!(projected[1].date, day("2025-03-11"));
    }

    #[test]
    fn test_week_mode_bounded_by_seven_days() {
        let today = day("2025-03-10");
        let mut sequence = vec![workout_day("A")];
        for _ in 0..8 {
            sequence.push(rest_day());
        }
        sequence.push(workout_day("Far"));

        // "Far" sits 9 days out, beyond the week bound
        let projected = project_timeline(&sequence, 0, TimelineMode::Week, today);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].item.name, "A");
    }

    #[test]
    fn test_empty_sequence_yields_empty() {
        let projected = project_timeline(&[], 0, TimelineMode::Next7, day("2025-03-10"));
        assert!(projected.is_empty());
    }

    #[test]
    fn test_each_position_emitted_once() {
        let today = day("2025-03-10");
        let sequence = vec![workout_day("A"), workout_day("B")];

        let projected = project_timeline(&sequence, 0, TimelineMode::Next7, today);
        assert_eq!(projected.len(), 2);
        let names: Vec<_> = projected.iter().map(|p| p.item.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }
}
