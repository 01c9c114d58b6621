// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! String key-value store persisted as one JSON file.
//!
//! Reads are served from memory. Every write rewrites the whole file,
//! which is fine for the handful of keys kept here. Memory only changes
//! once the file write succeeded.

use crate::error::AppError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// Local key-value store.
#[derive(Clone)]
pub struct LocalStore {
    /// Backing file; `None` keeps everything in memory.
    path: Option<PathBuf>,
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl LocalStore {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged
    /// and also starts empty; the next write replaces it.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let entries = load_entries(&path).await?;

        tracing::info!(
            path = %path.display(),
            keys = entries.len(),
            "Local store opened"
        );

        Ok(Self {
            path: Some(path),
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Create an in-memory store (offline tests).
    pub fn new_mock() -> Self {
        Self {
            path: None,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Set `key` and write the file, even when the value is unchanged.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    /// Remove `key` and write the file. Returns the previous value.
    pub async fn remove(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(None);
        }
        let mut next = entries.clone();
        let previous = next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(previous)
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }

        let payload = serde_json::to_vec_pretty(entries)
            .map_err(|e| AppError::Storage(format!("serialize: {}", e)))?;
        fs::write(path, payload)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "Local store written");
        Ok(())
    }
}

async fn load_entries(path: &Path) -> Result<HashMap<String, String>, AppError> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt local store, starting empty");
                Ok(HashMap::new())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(AppError::Storage(format!("read {}: {}", path.display(), e))),
    }
}
