// ABOUTME: Routine persistence orchestrator with template copy-on-write
// ABOUTME: Creates routines through the server-side function, updates with client-side ownership checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Routine persistence.
//!
//! Core guarantee: once a routine is persisted, every workout it references
//! is a routine-private copy. Editing a template later never changes a
//! routine built from it, and editing a routine's days never mutates the
//! template.
//!
//! Creation runs server-side through the `create-routine` callable function
//! so the multi-row copy is atomic. Updates run client-side because they
//! must compare each referenced workout against the copies this routine
//! already owns; a day whose copy fails is left unresolved, the routine is
//! marked `needs_repair`, and the outcome reports the affected day names.

use crate::backend::{DataStore, Filter, FunctionInvoker};
use crate::constants::{functions, tables};
use crate::context::Session;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{Routine, SequenceItem, WorkoutSnapshot};
use crate::services::workouts::{
    fetch_workout_exercises, persist_exercises, row_id, validated_name,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of a routine update, including best-effort copy degradation
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineSaveOutcome {
    /// The routine as persisted
    pub routine: Routine,
    /// Names of days whose workout copy failed and was left unresolved;
    /// empty on a fully clean save
    pub unresolved_days: Vec<String>,
}

impl RoutineSaveOutcome {
    /// Whether every day was resolved to a routine-private copy
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved_days.is_empty()
    }

    /// `PartialCopyFailure` warning describing a degraded save, `None` when
    /// the save was clean
    #[must_use]
    pub fn repair_warning(&self) -> Option<AppError> {
        if self.unresolved_days.is_empty() {
            return None;
        }
        Some(
            AppError::new(
                ErrorCode::PartialCopyFailure,
                format!("unresolved days: {}", self.unresolved_days.join(", ")),
            )
            .with_resource_id(self.routine.id.to_string()),
        )
    }
}

/// Orchestrates routine reads and writes
#[derive(Clone)]
pub struct RoutineService {
    store: Arc<dyn DataStore>,
    functions: Arc<dyn FunctionInvoker>,
}

impl RoutineService {
    /// Service over the given data store and function endpoint
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, functions: Arc<dyn FunctionInvoker>) -> Self {
        Self { store, functions }
    }

    /// Create a routine through the server-side transactional function.
    ///
    /// Every workout-type day in the input is deep-copied into a
    /// routine-private workout before the routine is stored; the returned
    /// sequence carries the rewritten private ids.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty name, `InvalidInput` for
    /// an empty sequence, and `FunctionError` when the function reports a
    /// failure. Nothing is persisted on error.
    pub async fn create_routine(
        &self,
        session: &Session,
        name: &str,
        sequence: Vec<SequenceItem>,
    ) -> AppResult<Routine> {
        let name = validated_name(name)?;
        if sequence.is_empty() {
            return Err(AppError::invalid_input("empty routine"));
        }

        let payload = json!({
            "routine_name": name,
            "exercises": sequence,
            "user_id": session.user_id,
        });
        let data = self.functions.invoke(functions::CREATE_ROUTINE, payload).await?;
        let routine: Routine = serde_json::from_value(data)?;
        info!(routine_id = %routine.id, days = routine.sequence.len(), "routine created");
        Ok(routine)
    }

    /// Update a routine's name and sequence with copy-on-write.
    ///
    /// Each workout-type day is checked against this routine's ownership
    /// tag: a workout already private to the routine is reused in place; a
    /// template, a foreign routine's copy, or an unsaved draft is deep-
    /// copied and the day rewritten to the private id. Running the same
    /// update twice therefore copies nothing the second time.
    ///
    /// The header write is a single update call; a failure there aborts the
    /// operation. Per-day copy failures degrade: the day stays unresolved,
    /// the routine is patched with `needs_repair`, and the outcome lists the
    /// affected day names.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty name and a backend error
    /// when the header write fails.
    pub async fn update_routine(
        &self,
        session: &Session,
        routine_id: Uuid,
        name: &str,
        sequence: Vec<SequenceItem>,
    ) -> AppResult<RoutineSaveOutcome> {
        let name = validated_name(name)?;

        let mut resolved = sequence;
        let mut unresolved_days = Vec::new();
        for item in &mut resolved {
            let Some(snapshot) = item.workout.as_ref() else {
                continue;
            };
            // Only the header write may abort; any failure while resolving a
            // day degrades to an unresolved entry
            match self.resolve_day(session, routine_id, snapshot).await {
                Ok(Some(private)) => item.workout = Some(private),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        routine_id = %routine_id,
                        day = %item.name,
                        error = %e,
                        "day resolution failed, leaving day unresolved"
                    );
                    unresolved_days.push(item.name.clone());
                }
            }
        }

        let row = self
            .store
            .update(
                tables::ROUTINES,
                &routine_id.to_string(),
                json!({
                    "name": name,
                    "sequence": resolved,
                    "needs_repair": !unresolved_days.is_empty(),
                }),
            )
            .await?;
        let routine: Routine = serde_json::from_value(row)?;
        info!(
            routine_id = %routine.id,
            unresolved = unresolved_days.len(),
            "routine updated"
        );
        let outcome = RoutineSaveOutcome {
            routine,
            unresolved_days,
        };
        if let Some(warning) = outcome.repair_warning() {
            warn!(routine_id = %outcome.routine.id, error = %warning, "routine needs repair");
        }
        Ok(outcome)
    }

    /// Delete a routine and every workout privately owned by it.
    ///
    /// The cascade is by convention, not delegated to the database: private
    /// workout rows and their set details are removed explicitly so no
    /// orphans survive a missing foreign-key cascade.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the routine row delete fails. Failures
    /// while removing private copies are logged and skipped.
    pub async fn delete_routine(&self, session: &Session, routine_id: Uuid) -> AppResult<()> {
        self.store
            .delete(
                tables::ROUTINES,
                &Filter::new()
                    .eq("id", routine_id)
                    .eq("user_id", session.user_id),
            )
            .await?;

        let private = self
            .store
            .query(
                tables::SAVED_WORKOUTS,
                &Filter::new().eq("routine_id", routine_id),
            )
            .await
            .unwrap_or_default();
        for row in &private {
            if let Ok(workout_id) = row_id(row, tables::SAVED_WORKOUTS) {
                if let Err(e) = self
                    .store
                    .delete(
                        tables::SET_DETAILS,
                        &Filter::new().eq("workout_id", workout_id),
                    )
                    .await
                {
                    warn!(workout_id = %workout_id, error = %e, "failed to delete set details");
                }
            }
        }
        if let Err(e) = self
            .store
            .delete(
                tables::SAVED_WORKOUTS,
                &Filter::new().eq("routine_id", routine_id),
            )
            .await
        {
            warn!(routine_id = %routine_id, error = %e, "failed to delete private workouts");
        }
        Ok(())
    }

    /// List the user's routines.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the query fails.
    pub async fn list_routines(&self, session: &Session) -> AppResult<Vec<Routine>> {
        let rows = self
            .store
            .query(
                tables::ROUTINES,
                &Filter::new().eq("user_id", session.user_id),
            )
            .await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    /// Fetch one routine by id.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id.
    pub async fn get_routine(&self, session: &Session, routine_id: Uuid) -> AppResult<Routine> {
        let rows = self
            .store
            .query(
                tables::ROUTINES,
                &Filter::new()
                    .eq("id", routine_id)
                    .eq("user_id", session.user_id),
            )
            .await?;
        let row = rows.into_iter().next().ok_or_else(|| {
            AppError::not_found(format!("routine {routine_id} not found"))
                .with_resource_id(routine_id.to_string())
        })?;
        serde_json::from_value(row).map_err(AppError::from)
    }

    /// Resolve one workout day: `None` when the referenced workout is
    /// already private to the routine, otherwise the freshly copied snapshot
    async fn resolve_day(
        &self,
        session: &Session,
        routine_id: Uuid,
        snapshot: &WorkoutSnapshot,
    ) -> AppResult<Option<WorkoutSnapshot>> {
        if self.owned_by_routine(snapshot, routine_id).await? {
            return Ok(None);
        }
        copy_workout_for_routine(self.store.as_ref(), session.user_id, routine_id, snapshot)
            .await
            .map(Some)
    }

    /// Whether a referenced workout is already privately owned by the routine
    async fn owned_by_routine(
        &self,
        snapshot: &WorkoutSnapshot,
        routine_id: Uuid,
    ) -> AppResult<bool> {
        let Some(workout_id) = snapshot.id else {
            // Fresh draft with no id yet: always copied
            return Ok(false);
        };
        let rows = self
            .store
            .query(
                tables::SAVED_WORKOUTS,
                &Filter::new().eq("id", workout_id),
            )
            .await?;
        Ok(rows
            .first()
            .and_then(|row| row.get("routine_id"))
            .and_then(Value::as_str)
            .is_some_and(|tag| Uuid::parse_str(tag).ok() == Some(routine_id)))
    }
}

/// Deep-copy a referenced workout into a routine-private copy.
///
/// Fetches the referenced workout's full exercise/set detail (falling back
/// to the embedded snapshot for unsaved drafts), creates a workout row owned
/// by the user and tagged with the routine, writes its exercise and set
/// rows, and returns the snapshot rewritten to the private id.
///
/// Also the body of the server-side `create-routine` function; the hosted
/// implementation runs the same steps under a transaction.
///
/// # Errors
///
/// Returns a backend error when the new workout header cannot be written.
pub async fn copy_workout_for_routine(
    store: &dyn DataStore,
    user_id: Uuid,
    routine_id: Uuid,
    snapshot: &WorkoutSnapshot,
) -> AppResult<WorkoutSnapshot> {
    let exercises = match snapshot.id {
        Some(source_id) => match fetch_workout_exercises(store, source_id).await {
            Ok(detail) if !detail.is_empty() => detail,
            Ok(_) => snapshot.exercises.clone(),
            Err(e) => {
                debug!(
                    source_id = %source_id,
                    error = %e,
                    "falling back to embedded snapshot exercises"
                );
                snapshot.exercises.clone()
            }
        },
        None => snapshot.exercises.clone(),
    };

    let row = store
        .insert(
            tables::SAVED_WORKOUTS,
            json!({
                "user_id": user_id,
                "name": snapshot.name,
                "routine_id": routine_id,
            }),
        )
        .await?;
    let private_id = row_id(&row, tables::SAVED_WORKOUTS)?;

    persist_exercises(store, private_id, &exercises).await;

    Ok(WorkoutSnapshot {
        id: Some(private_id),
        name: snapshot.name.clone(),
        exercises,
    })
}
