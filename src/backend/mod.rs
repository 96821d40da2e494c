// ABOUTME: Generic backend abstraction for the hosted data store and callable functions
// ABOUTME: Trait-based plugin architecture with REST and in-memory implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Backend abstraction.
//!
//! The core never talks to a concrete backend directly: orchestrators depend
//! on [`DataStore`] (generic row query/insert/update/delete, row-level
//! ownership enforced server-side by authenticated identity) and
//! [`FunctionInvoker`] (callable serverless functions used where a multi-row
//! write needs server-side atomicity).

use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde_json::Value;

pub mod memory;
pub mod rest;

pub use memory::MemoryBackend;
pub use rest::RestBackend;

/// One filter condition on a row query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Column equals value (values are compared in string form)
    Eq {
        /// Column name
        column: String,
        /// Expected value
        value: String,
    },
    /// Column is SQL NULL / absent
    IsNull {
        /// Column name
        column: String,
    },
}

/// Conjunction of filter conditions; empty matches every row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Filter matching every row
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Require `column == value`
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.conditions.push(Condition::Eq {
            column: column.to_owned(),
            value: value.to_string(),
        });
        self
    }

    /// Require `column IS NULL`
    #[must_use]
    pub fn is_null(mut self, column: &str) -> Self {
        self.conditions.push(Condition::IsNull {
            column: column.to_owned(),
        });
        self
    }

    /// The accumulated conditions
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether the filter matches every row
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the filter against a JSON row object
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.conditions.iter().all(|cond| match cond {
            Condition::Eq { column, value } => match row.get(column) {
                Some(Value::String(s)) => s == value,
                Some(other) => !other.is_null() && other.to_string() == *value,
                None => false,
            },
            Condition::IsNull { column } => {
                row.get(column).is_none_or(Value::is_null)
            }
        })
    }
}

/// Generic row store over the hosted backend.
///
/// Rows are JSON objects carrying at least an `id` field once persisted.
/// Each call is its own atomic unit; multi-step operations built on top are
/// not atomic as a whole.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch all rows of a table matching the filter.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the request fails.
    async fn query(&self, table: &str, filter: &Filter) -> AppResult<Vec<Value>>;

    /// Insert a row and return it as stored (with generated fields).
    ///
    /// # Errors
    ///
    /// Returns a backend error when the request fails.
    async fn insert(&self, table: &str, row: Value) -> AppResult<Value>;

    /// Patch the row with the given id and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the request fails or the row is missing.
    async fn update(&self, table: &str, id: &str, patch: Value) -> AppResult<Value>;

    /// Delete all rows matching the filter.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the request fails. Deleting with an
    /// empty filter is rejected to avoid wiping a table by accident.
    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()>;
}

/// Callable serverless function endpoint
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invoke a named function and return its decoded `data` payload.
    ///
    /// # Errors
    ///
    /// Returns `FunctionError` when the function reports an error envelope,
    /// or a backend error when the call itself fails.
    async fn invoke(&self, name: &str, payload: Value) -> AppResult<Value>;
}

/// Decode the `{ "data": … } | { "error": … }` response envelope used by
/// callable functions.
///
/// # Errors
///
/// Returns `FunctionError` for an error envelope or a malformed response.
pub fn decode_envelope(response: Value) -> AppResult<Value> {
    if let Some(error) = response.get("error") {
        let message = error
            .as_str()
            .map_or_else(|| error.to_string(), std::borrow::ToOwned::to_owned);
        return Err(AppError::function(message));
    }
    response
        .get("data")
        .cloned()
        .ok_or_else(|| AppError::function("response carried neither data nor error"))
}
