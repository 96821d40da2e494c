// ABOUTME: Application constants for the Cadence core
// ABOUTME: Centralizes env var names, backend table names, and local storage keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Centralized names so that table/key/env strings exist in exactly one place.

/// Environment variable names
pub mod env_config {
    /// Backend base URL (e.g. `https://project.example.co`)
    pub const BACKEND_URL: &str = "CADENCE_BACKEND_URL";
    /// Publishable API key sent with every backend request
    pub const BACKEND_API_KEY: &str = "CADENCE_BACKEND_API_KEY";
    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "CADENCE_ENVIRONMENT";
    /// Log level override (error, warn, info, debug, trace)
    pub const LOG_LEVEL: &str = "CADENCE_LOG_LEVEL";
    /// Log format override (json, pretty, compact)
    pub const LOG_FORMAT: &str = "CADENCE_LOG_FORMAT";
}

/// Backend table names
pub mod tables {
    /// Routine headers, with the day sequence stored as a JSON column
    pub const ROUTINES: &str = "routines";
    /// Workout headers, both shared templates and routine-private copies
    pub const SAVED_WORKOUTS: &str = "saved_workouts";
    /// Exercise catalog rows, resolved by name
    pub const EXERCISES: &str = "exercises";
    /// Planned set rows (reps/weight/duration targets) per workout exercise
    pub const SET_DETAILS: &str = "set_details";
}

/// Callable serverless function names
pub mod functions {
    /// Server-side transactional routine creation with template deep-copy
    pub const CREATE_ROUTINE: &str = "create-routine";
}

/// Local key-value storage keys
pub mod storage_keys {
    /// Cached active-routine progress record
    pub const ACTIVE_ROUTINE_PROGRESS: &str = "active_routine_progress";
    /// Cached in-progress routine draft (guest/offline editing)
    pub const ROUTINE_DRAFT: &str = "routine_draft";
}

/// Service identity used in structured logs
pub mod service_names {
    /// Crate-level service name
    pub const CORE: &str = "cadence-core";
}
