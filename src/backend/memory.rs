// ABOUTME: In-memory implementation of the data store for tests and guest/offline mode
// ABOUTME: DashMap-backed JSON row tables with generated ids and timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

use crate::backend::{DataStore, Filter};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory row store.
///
/// Mirrors the hosted store's observable behavior closely enough for tests
/// and guest/offline sessions: inserts generate `id` and `created_at` when
/// absent, updates merge a patch object into the stored row, deletes require
/// a filter.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<DashMap<String, Vec<Value>>>,
}

impl MemoryBackend {
    /// Empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently in a table (test assertions)
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, |rows| rows.len())
    }
}

#[async_trait]
impl DataStore for MemoryBackend {
    async fn query(&self, table: &str, filter: &Filter) -> AppResult<Vec<Value>> {
        Ok(self.tables.get(table).map_or_else(Vec::new, |rows| {
            rows.iter().filter(|row| filter.matches(row)).cloned().collect()
        }))
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<Value> {
        let Value::Object(mut fields) = row else {
            return Err(AppError::invalid_input(format!(
                "{table}: insert expects a JSON object"
            )));
        };
        if !fields.contains_key("id") || fields["id"].is_null() {
            fields.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        }
        fields
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        let stored = Value::Object(fields);
        self.tables
            .entry(table.to_owned())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> AppResult<Value> {
        let Value::Object(patch_fields) = patch else {
            return Err(AppError::invalid_input(format!(
                "{table}: update expects a JSON object"
            )));
        };
        let mut rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| AppError::not_found(format!("{table}: no row with id {id}")))?;
        let row = rows
            .iter_mut()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| {
                AppError::not_found(format!("{table}: no row with id {id}")).with_resource_id(id)
            })?;
        if let Value::Object(fields) = row {
            for (key, value) in patch_fields {
                fields.insert(key, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()> {
        if filter.is_empty() {
            return Err(AppError::invalid_input(format!(
                "refusing unfiltered delete on {table}"
            )));
        }
        if let Some(mut rows) = self.tables.get_mut(table) {
            rows.retain(|row| !filter.matches(row));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_generates_id_and_created_at() {
        let backend = MemoryBackend::new();
        let row = backend
            .insert("routines", json!({"name": "PPL"}))
            .await
            .unwrap();
        assert!(row["id"].is_string());
        assert!(row["created_at"].is_string());
        assert_eq!(backend.row_count("routines"), 1);
    }

    #[tokio::test]
    async fn test_query_filters_rows() {
        let backend = MemoryBackend::new();
        backend
            .insert("saved_workouts", json!({"name": "Push", "user_id": "u1"}))
            .await
            .unwrap();
        backend
            .insert("saved_workouts", json!({"name": "Pull", "user_id": "u2"}))
            .await
            .unwrap();

        let rows = backend
            .query("saved_workouts", &Filter::new().eq("user_id", "u1"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Push");
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let backend = MemoryBackend::new();
        let row = backend
            .insert("routines", json!({"name": "Old"}))
            .await
            .unwrap();
        let id = row["id"].as_str().unwrap();

        let updated = backend
            .update("routines", id, json!({"name": "New"}))
            .await
            .unwrap();
        assert_eq!(updated["name"], "New");
        assert_eq!(updated["id"], row["id"]);

        let err = backend
            .update("routines", "missing", json!({"name": "X"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ResourceNotFound);
    }

    #[tokio::test]
    async fn test_delete_requires_filter() {
        let backend = MemoryBackend::new();
        backend
            .insert("set_details", json!({"workout_id": "w1"}))
            .await
            .unwrap();

        assert!(backend.delete("set_details", &Filter::new()).await.is_err());
        backend
            .delete("set_details", &Filter::new().eq("workout_id", "w1"))
            .await
            .unwrap();
        assert_eq!(backend.row_count("set_details"), 0);
    }
}
