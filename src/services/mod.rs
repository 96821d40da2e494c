// ABOUTME: Domain service layer for persistence orchestration
// ABOUTME: Backend-agnostic business logic reusable across the Cadence app frontends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Domain service layer.
//!
//! Orchestrators validate input synchronously, then coordinate the backend
//! writes. Every call takes an explicit [`crate::context::Session`]; there is
//! no ambient user state. Callers are expected to disable the triggering
//! control while a save is in flight; the services do not deduplicate
//! concurrent submissions.

/// Routine persistence: create, update with copy-on-write, cascade delete
pub mod routines;

/// Standalone saved-workout persistence
pub mod workouts;
