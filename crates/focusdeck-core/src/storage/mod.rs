//! Keyed record storage.
//!
//! Every module owns one key and stores its state as a JSON document under
//! it. Backends only move strings; [`StorageExt`] layers serde on top and
//! implements the "fall back to default on unreadable data" rule.

mod config;
pub mod database;
pub mod memory;

pub use config::{Config, HabitsConfig, TimerConfig};
pub use database::SqliteStorage;
pub use memory::MemoryStorage;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::StorageError;

/// A string key-value store.
pub trait Storage {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed access on top of any [`Storage`].
pub trait StorageExt: Storage {
    /// Read and decode `key`, or return `default`.
    ///
    /// Missing, empty, unreadable and unparseable records all yield the
    /// default; the latter two are logged.
    fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read record, using default");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to parse record, using default");
                default
            }
        }
    }

    /// Like [`StorageExt::load_or`] with `T::default()`.
    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_or(key, T::default())
    }

    /// Encode `value` and write it under `key`.
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set_raw(key, &json)?;
        tracing::debug!(key, bytes = json.len(), "record saved");
        Ok(())
    }
}

impl<S: Storage + ?Sized> StorageExt for S {}

/// Returns the data directory, creating it if needed.
///
/// `FOCUSDECK_DATA_DIR` overrides the location outright. Otherwise the
/// directory is `~/.config/focusdeck[-dev]/`, with the `-dev` suffix
/// selected by `FOCUSDECK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("FOCUSDECK_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSDECK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusdeck-dev")
            } else {
                base_dir.join("focusdeck")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
