// ABOUTME: Logging configuration and structured logging setup for the Cadence core
// ABOUTME: Configures tracing-subscriber with env-filter and json/pretty/compact output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Structured logging setup.
//!
//! Library code only emits `tracing` events; the embedding app calls
//! [`init_logging`] once at startup to install a subscriber.

use crate::config::{Environment, LogLevel};
use crate::constants::{env_config, service_names};
use crate::errors::{AppError, AppResult};
use std::env;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl LogFormat {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level floor when `RUST_LOG` is unset
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Service name attached to structured output
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            service_name: service_names::CORE.into(),
        }
    }
}

impl LoggingConfig {
    /// Build configuration from the environment and deployment mode.
    ///
    /// Production defaults to JSON output; everything else stays pretty.
    #[must_use]
    pub fn from_env(environment: Environment, level: LogLevel) -> Self {
        let format = env::var(env_config::LOG_FORMAT).map_or_else(
            |_| {
                if environment.is_production() {
                    LogFormat::Json
                } else {
                    LogFormat::Pretty
                }
            },
            |s| LogFormat::from_str_or_default(&s),
        );
        Self {
            level,
            format,
            service_name: service_names::CORE.into(),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns `ConfigError` if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
    };

    result.map_err(|e| AppError::config(format!("failed to install subscriber: {e}")))?;

    info!(
        service = %config.service_name,
        level = %config.level,
        "logging initialized"
    );
    Ok(())
}
