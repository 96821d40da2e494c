// ABOUTME: Environment configuration management for the Cadence core
// ABOUTME: Parses backend connection settings and deployment mode from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Environment-based configuration.
//!
//! The apps embed no config files; everything comes from the environment at
//! startup. Unrecognized values fall back to defaults with a warning rather
//! than failing, except for the two settings that have no sensible default
//! (backend URL and API key).

use crate::constants::env_config;
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;
use url::Url;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose debugging
    Debug,
    /// Full tracing
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }

    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated testing
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Backend connection and runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend base URL; REST and function endpoints hang off this
    pub base_url: Url,
    /// Publishable API key sent with every request
    pub api_key: String,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when the backend URL or API key is unset, and
    /// `ConfigError` when the URL does not parse.
    pub fn from_env() -> AppResult<Self> {
        let raw_url = env::var(env_config::BACKEND_URL).map_err(|_| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!("{} is not set", env_config::BACKEND_URL),
            )
        })?;
        let base_url = Url::parse(&raw_url)
            .map_err(|e| AppError::config(format!("invalid {}: {e}", env_config::BACKEND_URL)))?;

        let api_key = env::var(env_config::BACKEND_API_KEY).map_err(|_| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!("{} is not set", env_config::BACKEND_API_KEY),
            )
        })?;

        let environment = env::var(env_config::ENVIRONMENT).map_or_else(
            |_| Environment::default(),
            |s| Environment::from_str_or_default(&s),
        );

        let log_level = env::var(env_config::LOG_LEVEL).map_or_else(
            |_| LogLevel::default(),
            |s| {
                let level = LogLevel::from_str_or_default(&s);
                if level == LogLevel::Info && !s.eq_ignore_ascii_case("info") {
                    warn!(value = %s, "unrecognized log level, defaulting to info");
                }
                level
            },
        );

        Ok(Self {
            base_url,
            api_key,
            environment,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("nope"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default(""),
            Environment::Development
        );
        assert!(Environment::Production.is_production());
    }
}
