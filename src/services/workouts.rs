// ABOUTME: Workout persistence orchestrator for standalone saved workouts
// ABOUTME: Decomposes an exercise list into normalized exercise and set-detail rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Saved-workout persistence.
//!
//! A saved workout is a header row plus, per exercise, an exercise-catalog
//! row (resolved by name, created on first use) and one set-detail row per
//! planned set. Leaf writes are best-effort: a failed set row is logged and
//! skipped, a failed header write aborts the operation.

use crate::backend::{DataStore, Filter};
use crate::constants::tables;
use crate::context::Session;
use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, SavedWorkout, SetTarget};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Orchestrates saved-workout reads and writes
#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn DataStore>,
}

impl WorkoutService {
    /// Service over the given data store
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Create a saved workout (shared template) from an exercise list.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty name and a backend error
    /// when the header write fails. Per-set failures are logged, not raised.
    pub async fn save_workout(
        &self,
        session: &Session,
        name: &str,
        exercises: &[Exercise],
    ) -> AppResult<SavedWorkout> {
        let name = validated_name(name)?;
        let row = self
            .store
            .insert(
                tables::SAVED_WORKOUTS,
                json!({
                    "user_id": session.user_id,
                    "name": name,
                    "routine_id": Value::Null,
                }),
            )
            .await?;
        let workout_id = row_id(&row, tables::SAVED_WORKOUTS)?;

        persist_exercises(self.store.as_ref(), workout_id, exercises).await;

        let mut workout = workout_from_row(&row)?;
        workout.exercises = exercises.to_vec();
        Ok(workout)
    }

    /// Replace a saved workout's name and exercise list.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty name, `ResourceNotFound`
    /// for an unknown id, and a backend error when the header write fails.
    pub async fn update_saved_workout(
        &self,
        session: &Session,
        workout_id: Uuid,
        name: &str,
        exercises: &[Exercise],
    ) -> AppResult<SavedWorkout> {
        let name = validated_name(name)?;
        let owned = self
            .store
            .query(
                tables::SAVED_WORKOUTS,
                &Filter::new()
                    .eq("id", workout_id)
                    .eq("user_id", session.user_id),
            )
            .await?;
        if owned.is_empty() {
            return Err(AppError::not_found(format!("workout {workout_id} not found"))
                .with_user_id(session.user_id));
        }
        let row = self
            .store
            .update(
                tables::SAVED_WORKOUTS,
                &workout_id.to_string(),
                json!({ "name": name }),
            )
            .await?;

        // Planned sets are replaced wholesale rather than diffed
        self.store
            .delete(
                tables::SET_DETAILS,
                &Filter::new().eq("workout_id", workout_id),
            )
            .await?;
        persist_exercises(self.store.as_ref(), workout_id, exercises).await;

        let mut workout = workout_from_row(&row)?;
        workout.exercises = exercises.to_vec();
        Ok(workout)
    }

    /// Delete a saved workout and its set-detail rows.
    ///
    /// # Errors
    ///
    /// Returns a backend error when a delete fails.
    pub async fn delete_saved_workout(
        &self,
        session: &Session,
        workout_id: Uuid,
    ) -> AppResult<()> {
        self.store
            .delete(
                tables::SET_DETAILS,
                &Filter::new().eq("workout_id", workout_id),
            )
            .await?;
        self.store
            .delete(
                tables::SAVED_WORKOUTS,
                &Filter::new()
                    .eq("id", workout_id)
                    .eq("user_id", session.user_id),
            )
            .await
    }

    /// List the user's shared templates (routine-private copies excluded).
    ///
    /// Returns header rows only; exercise lists come from
    /// [`Self::get_saved_workout`].
    ///
    /// # Errors
    ///
    /// Returns a backend error when the query fails.
    pub async fn list_saved_workouts(&self, session: &Session) -> AppResult<Vec<SavedWorkout>> {
        let rows = self
            .store
            .query(
                tables::SAVED_WORKOUTS,
                &Filter::new()
                    .eq("user_id", session.user_id)
                    .is_null("routine_id"),
            )
            .await?;
        rows.iter().map(workout_from_row).collect()
    }

    /// Fetch one saved workout with its full exercise/set detail.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id.
    pub async fn get_saved_workout(
        &self,
        session: &Session,
        workout_id: Uuid,
    ) -> AppResult<SavedWorkout> {
        let rows = self
            .store
            .query(
                tables::SAVED_WORKOUTS,
                &Filter::new()
                    .eq("id", workout_id)
                    .eq("user_id", session.user_id),
            )
            .await?;
        let row = rows.first().ok_or_else(|| {
            AppError::not_found(format!("workout {workout_id} not found"))
                .with_resource_id(workout_id.to_string())
        })?;
        let mut workout = workout_from_row(row)?;
        workout.exercises = fetch_workout_exercises(self.store.as_ref(), workout_id).await?;
        Ok(workout)
    }
}

/// Trim and require a non-empty name
pub(crate) fn validated_name(name: &str) -> AppResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_field("name"));
    }
    Ok(trimmed)
}

/// Extract a row's `id` field as a `Uuid`
pub(crate) fn row_id(row: &Value, table: &str) -> AppResult<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::backend(format!("{table}: row has no usable id")))
}

/// Parse a saved-workout header row
pub(crate) fn workout_from_row(row: &Value) -> AppResult<SavedWorkout> {
    serde_json::from_value(row.clone()).map_err(AppError::from)
}

/// Write exercise-catalog and set-detail rows for a workout.
///
/// Best-effort: each failed leaf write is logged and skipped so one bad row
/// does not lose the rest of the workout.
pub(crate) async fn persist_exercises(
    store: &dyn DataStore,
    workout_id: Uuid,
    exercises: &[Exercise],
) {
    for exercise in exercises {
        let exercise_id = match resolve_exercise(store, &exercise.name).await {
            Ok(id) => id,
            Err(e) => {
                error!(
                    workout_id = %workout_id,
                    exercise = %exercise.name,
                    error = %e,
                    "failed to resolve exercise, skipping its sets"
                );
                continue;
            }
        };
        for set_number in 1..=exercise.sets {
            let target = exercise
                .set_targets
                .get((set_number - 1) as usize)
                .cloned()
                .unwrap_or(SetTarget {
                    reps: Some(exercise.reps),
                    weight: None,
                    duration_secs: None,
                });
            let result = store
                .insert(
                    tables::SET_DETAILS,
                    json!({
                        "workout_id": workout_id,
                        "exercise_id": exercise_id,
                        "set_number": set_number,
                        "target_reps": target.reps,
                        "target_weight": target.weight,
                        "target_duration_secs": target.duration_secs,
                    }),
                )
                .await;
            if let Err(e) = result {
                error!(
                    workout_id = %workout_id,
                    exercise = %exercise.name,
                    set_number,
                    error = %e,
                    "failed to write set detail"
                );
            }
        }
    }
}

/// Resolve an exercise-catalog row by name, creating it on first use
pub(crate) async fn resolve_exercise(store: &dyn DataStore, name: &str) -> AppResult<Uuid> {
    let rows = store
        .query(tables::EXERCISES, &Filter::new().eq("name", name))
        .await?;
    if let Some(row) = rows.first() {
        return row_id(row, tables::EXERCISES);
    }
    let row = store
        .insert(tables::EXERCISES, json!({ "name": name }))
        .await?;
    row_id(&row, tables::EXERCISES)
}

/// Rebuild a workout's exercise list from its set-detail rows
pub(crate) async fn fetch_workout_exercises(
    store: &dyn DataStore,
    workout_id: Uuid,
) -> AppResult<Vec<Exercise>> {
    let set_rows = store
        .query(
            tables::SET_DETAILS,
            &Filter::new().eq("workout_id", workout_id),
        )
        .await?;

    // Group rows by exercise in first-seen order
    let mut exercises: Vec<Exercise> = Vec::new();
    let mut ids: Vec<Uuid> = Vec::new();
    for row in &set_rows {
        let Ok(exercise_id) = row_id_field(row, "exercise_id") else {
            debug!(workout_id = %workout_id, "set row without exercise_id, skipping");
            continue;
        };
        let position = match ids.iter().position(|id| *id == exercise_id) {
            Some(pos) => pos,
            None => {
                let name = exercise_name(store, exercise_id).await?;
                ids.push(exercise_id);
                exercises.push(Exercise {
                    id: Some(exercise_id),
                    name,
                    sets: 0,
                    reps: 0,
                    set_targets: Vec::new(),
                });
                exercises.len() - 1
            }
        };
        let exercise = &mut exercises[position];
        let target = SetTarget {
            reps: row
                .get("target_reps")
                .and_then(Value::as_u64)
                .map(|r| r as u32),
            weight: row.get("target_weight").and_then(Value::as_f64),
            duration_secs: row
                .get("target_duration_secs")
                .and_then(Value::as_u64)
                .map(|d| d as u32),
        };
        if exercise.sets == 0 {
            exercise.reps = target.reps.unwrap_or(0);
        }
        exercise.sets += 1;
        exercise.set_targets.push(target);
    }
    Ok(exercises)
}

fn row_id_field(row: &Value, field: &str) -> AppResult<Uuid> {
    row.get(field)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::backend(format!("row has no usable {field}")))
}

async fn exercise_name(store: &dyn DataStore, exercise_id: Uuid) -> AppResult<String> {
    let rows = store
        .query(tables::EXERCISES, &Filter::new().eq("id", exercise_id))
        .await?;
    Ok(rows
        .first()
        .and_then(|row| row.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown exercise")
        .to_owned())
}
