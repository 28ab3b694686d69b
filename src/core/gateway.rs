//! Store-level operations over the raw engine.

use crate::core::engine::KeychainEngine;
use crate::error::{KeychainError, Result};
use std::path::{Path, PathBuf};

pub struct StoreGateway<'a> {
    engine: &'a dyn KeychainEngine,
    lock_timeout_secs: u32,
}

impl<'a> StoreGateway<'a> {
    pub fn new(engine: &'a dyn KeychainEngine, lock_timeout_secs: u32) -> Self {
        Self {
            engine,
            lock_timeout_secs,
        }
    }

    /// The search list in engine order, with the engine's quoting removed.
    pub fn list_active_stores(&self) -> Result<Vec<PathBuf>> {
        self.engine
            .list_active()?
            .iter()
            .map(|line| decode_quoted(line).map(PathBuf::from))
            .collect()
    }

    /// Create the store with `password` as its unlock credential.
    pub fn create_store(&self, path: &Path, password: &str) -> Result<()> {
        self.engine.create(path, password)
    }

    /// Lock on sleep and after the configured idle timeout.
    pub fn apply_lock_timeout(&self, path: &Path) -> Result<()> {
        self.engine.set_lock_timeout(path, self.lock_timeout_secs)
    }

    /// Replace the search list; callers read-modify-write via `list_active_stores`.
    pub fn set_active_stores(&self, paths: &[PathBuf]) -> Result<()> {
        self.engine.set_active(paths)
    }

    pub fn unlock_store(&self, path: &Path, password: &str) -> Result<()> {
        self.engine.unlock(path, password)
    }

    /// Irreversible.
    pub fn delete_store(&self, path: &Path) -> Result<()> {
        self.engine.delete(path)
    }
}

/// Decode one search-list line: a JSON-style quoted string, padded with spaces.
fn decode_quoted(line: &str) -> Result<String> {
    serde_json::from_str::<String>(line.trim()).map_err(|_| KeychainError::UnexpectedOutput {
        action: "list-keychains",
        line: line.to_string(),
    })
}
