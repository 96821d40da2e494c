// ABOUTME: Unified error handling for the Cadence core
// ABOUTME: Defines error codes, the AppError type, and conversion impls used across all modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! # Unified Error Handling System
//!
//! Centralized error handling for the Cadence core. Defines standard error
//! codes and a single `AppError` type so that validation failures, backend
//! failures, and partial-copy degradation are distinguishable at every call
//! site without string matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// The provided input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field is missing
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// The operation is not valid in the current state
    #[serde(rename = "INVALID_STATE")]
    InvalidState = 3002,

    // Resource Management (4000-4999)
    /// The requested resource was not found
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // Backend (5000-5999)
    /// The data store rejected or failed an operation
    #[serde(rename = "BACKEND_ERROR")]
    BackendError = 5000,
    /// The backend could not be reached
    #[serde(rename = "BACKEND_UNAVAILABLE")]
    BackendUnavailable = 5001,
    /// A callable serverless function returned an error envelope
    #[serde(rename = "FUNCTION_ERROR")]
    FunctionError = 5002,
    /// One or more per-day copy steps failed after the routine header was written
    #[serde(rename = "PARTIAL_COPY_FAILURE")]
    PartialCopyFailure = 5100,

    // Configuration (6000-6999)
    /// Configuration error encountered
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Internal (9000-9999)
    /// An internal error occurred
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Local key-value storage operation failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// Data serialization/deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidState => "The operation is not valid in the current state",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::BackendError => "Backend operation failed",
            Self::BackendUnavailable => "The backend is currently unavailable",
            Self::FunctionError => "A backend function call failed",
            Self::PartialCopyFailure => "Some routine days could not be copied",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Local storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether this error was caused by user input and should be surfaced
    /// before any network call is attempted
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidState
        )
    }

    /// Whether retrying the same operation may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable | Self::BackendError)
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Resource ID if applicable (routine, workout, table row)
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: Option<serde_json::Value>,
}

/// Unified error type for the crate
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Invalid user input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorCode::MissingRequiredField, format!("{field} required"))
    }

    /// Operation attempted in the wrong state
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    /// Resource lookup failed
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Data store failure
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendError, message)
    }

    /// Callable function returned an error envelope
    #[must_use]
    pub fn function(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FunctionError, message)
    }

    /// Configuration problem
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Local storage failure
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Internal invariant violation
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Add a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add structured details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = Some(details);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, err.to_string()).with_source(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_connect() || err.is_timeout() {
            ErrorCode::BackendUnavailable
        } else {
            ErrorCode::BackendError
        };
        Self::new(code, err.to_string()).with_source(err)
    }
}

/// Result type alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;
