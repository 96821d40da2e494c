// ABOUTME: Local key-value persistence for guest/offline fallback
// ABOUTME: File-backed store under the platform data dir plus an in-memory store for tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

//! Local key-value persistence.
//!
//! Best-effort storage for drafts and progress when no backend session
//! exists. Not durable across reinstall; callers treat every value as a
//! cache, never as the source of truth.

use crate::errors::{AppError, AppResult};
use dashmap::DashMap;
use std::fs;
use std::path::PathBuf;

/// Generic string key-value store
pub trait LocalStore: Send + Sync {
    /// Read the value for a key, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the underlying store fails.
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    /// Write the value for a key, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the underlying store fails.
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key; no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the underlying store fails.
    fn remove_item(&self, key: &str) -> AppResult<()>;
}

/// File-backed store: one file per key under an app-specific directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at the platform data directory (`…/cadence`).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when no platform data directory exists or the
    /// app directory cannot be created.
    pub fn open_default() -> AppResult<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| AppError::storage("no platform data directory available"))?;
        Self::open(base.join("cadence"))
    }

    /// Store rooted at an explicit directory, created if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the directory cannot be created.
    pub fn open(dir: PathBuf) -> AppResult<Self> {
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::storage(format!("creating {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        // Keys come from constants::storage_keys; anything else must still
        // never escape the store directory.
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AppError::storage(format!("invalid storage key: {key}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStore for FileStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(format!("reading {key}: {e}"))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        fs::write(&path, value).map_err(|e| AppError::storage(format!("writing {key}: {e}")))
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!("removing {key}: {e}"))),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.items.get(key).map(|v| v.clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.items.remove(key);
        Ok(())
    }
}
