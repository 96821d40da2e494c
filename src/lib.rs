// ABOUTME: Main library entry point for the Cadence Fitness routine core
// ABOUTME: Routine composition, day scheduling, and backend persistence shared by the Cadence apps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

#![deny(unsafe_code)]

//! # Cadence Core
//!
//! Client-side core for the Cadence training apps: routine composition,
//! cyclic day scheduling, and persistence against the hosted backend
//! (relational data store + auth + callable serverless functions).
//!
//! ## Architecture
//!
//! - **Models**: routine, sequence, workout, and progress data structures
//! - **Sequence**: day-entry construction and the in-memory routine draft
//! - **Progress**: active-routine day-advancement state machine
//! - **Timeline**: bounded forward projection of upcoming workout days
//! - **Services**: persistence orchestrators over the backend traits
//! - **Backend**: generic data-store and callable-function interfaces with
//!   REST and in-memory implementations
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cadence_core::config::BackendConfig;
//! use cadence_core::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = BackendConfig::from_env()?;
//!     println!("Cadence core configured for backend: {}", config.base_url);
//!     Ok(())
//! }
//! ```

/// Generic backend interfaces (data store, callable functions) and implementations
pub mod backend;

/// Environment-based configuration
pub mod config;

/// Application constants: env var names, table names, storage keys
pub mod constants;

/// Session context passed explicitly to every persistence call
pub mod context;

/// Unified error handling: error codes, `AppError`, `AppResult`
pub mod errors;

/// Logging configuration and structured logging setup
pub mod logging;

/// Core data model: routines, sequences, workouts, progress
pub mod models;

/// Active-routine progress tracking and day advancement
pub mod progress;

/// Day-entry construction and the routine draft store
pub mod sequence;

/// Domain service layer: routine and workout persistence orchestrators
pub mod services;

/// Local key-value persistence for guest/offline fallback
pub mod storage;

/// Forward projection of upcoming days from a routine sequence
pub mod timeline;

pub use errors::{AppError, AppResult};
