// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides quiet logging, an in-memory backend, and a local create-routine function stub
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

#![allow(dead_code, missing_docs, clippy::unwrap_used, clippy::missing_panics_doc)]

//! Shared test utilities for `cadence_core` integration tests.

use async_trait::async_trait;
use cadence_core::backend::{DataStore, Filter, FunctionInvoker, MemoryBackend};
use cadence_core::context::Session;
use cadence_core::errors::{AppError, AppResult};
use cadence_core::models::{Exercise, Routine, SequenceItem, SetTarget};
use cadence_core::services::routines::copy_workout_for_routine;
use serde_json::{json, Value};
use std::sync::Once;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory backend with logging initialized
pub fn create_test_backend() -> MemoryBackend {
    init_test_logging();
    MemoryBackend::new()
}

/// Session for a random test user
pub fn test_session() -> Session {
    Session::new(Uuid::new_v4(), "test-token").with_email("test@example.com")
}

/// A small push-day exercise list
pub fn push_exercises() -> Vec<Exercise> {
    vec![
        Exercise {
            id: None,
            name: "Bench Press".into(),
            sets: 3,
            reps: 8,
            set_targets: vec![
                SetTarget {
                    reps: Some(8),
                    weight: Some(80.0),
                    duration_secs: None,
                },
                SetTarget {
                    reps: Some(8),
                    weight: Some(85.0),
                    duration_secs: None,
                },
            ],
        },
        Exercise::new("Overhead Press", 2, 10),
    ]
}

/// Local stand-in for the hosted `create-routine` function.
///
/// Runs the same copy-and-insert steps the hosted function performs, against
/// the shared in-memory backend.
#[derive(Clone)]
pub struct LocalFunctions {
    backend: MemoryBackend,
}

impl LocalFunctions {
    pub fn new(backend: MemoryBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl FunctionInvoker for LocalFunctions {
    async fn invoke(&self, name: &str, payload: Value) -> AppResult<Value> {
        if name != "create-routine" {
            return Err(AppError::function(format!("unknown function {name}")));
        }
        let routine_name = payload["routine_name"]
            .as_str()
            .ok_or_else(|| AppError::function("routine_name required"))?;
        let user_id: Uuid = serde_json::from_value(payload["user_id"].clone())
            .map_err(|_| AppError::function("user_id required"))?;
        let mut sequence: Vec<SequenceItem> =
            serde_json::from_value(payload["exercises"].clone())
                .map_err(|_| AppError::function("malformed sequence"))?;
        if sequence.is_empty() {
            return Err(AppError::function("empty routine"));
        }

        let routine_id = Uuid::new_v4();
        for item in &mut sequence {
            if let Some(snapshot) = item.workout.as_ref() {
                let private =
                    copy_workout_for_routine(&self.backend, user_id, routine_id, snapshot).await?;
                item.workout = Some(private);
            }
        }
        let row = self
            .backend
            .insert(
                "routines",
                json!({
                    "id": routine_id,
                    "user_id": user_id,
                    "name": routine_name,
                    "sequence": sequence,
                    "needs_repair": false,
                }),
            )
            .await?;
        Ok(row)
    }
}

/// Store wrapper that fails inserts into one table, for degradation tests
#[derive(Clone)]
pub struct FailingInserts {
    inner: MemoryBackend,
    fail_table: String,
}

impl FailingInserts {
    pub fn new(inner: MemoryBackend, fail_table: &str) -> Self {
        Self {
            inner,
            fail_table: fail_table.to_owned(),
        }
    }
}

#[async_trait]
impl DataStore for FailingInserts {
    async fn query(&self, table: &str, filter: &Filter) -> AppResult<Vec<Value>> {
        self.inner.query(table, filter).await
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<Value> {
        if table == self.fail_table {
            return Err(AppError::backend(format!("{table}: simulated failure")));
        }
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> AppResult<Value> {
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()> {
        self.inner.delete(table, filter).await
    }
}

/// Store wrapper that fails queries against one table, for degradation tests
#[derive(Clone)]
pub struct FailingQueries {
    inner: MemoryBackend,
    fail_table: String,
}

impl FailingQueries {
    pub fn new(inner: MemoryBackend, fail_table: &str) -> Self {
        Self {
            inner,
            fail_table: fail_table.to_owned(),
        }
    }
}

#[async_trait]
impl DataStore for FailingQueries {
    async fn query(&self, table: &str, filter: &Filter) -> AppResult<Vec<Value>> {
        if table == self.fail_table {
            return Err(AppError::backend(format!(
                "{table}: simulated query failure"
            )));
        }
        self.inner.query(table, filter).await
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<Value> {
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> AppResult<Value> {
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()> {
        self.inner.delete(table, filter).await
    }
}

/// Count the private workout copies tagged as belonging to a routine
pub async fn private_copy_count(backend: &MemoryBackend, routine: &Routine) -> usize {
    backend
        .query(
            "saved_workouts",
            &Filter::new().eq("routine_id", routine.id),
        )
        .await
        .unwrap()
        .len()
}
