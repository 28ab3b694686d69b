//! Ordered create/delete procedures for temporary keychains.
//!
//! Each procedure stops at the first failing engine call. Nothing is rolled
//! back: a keychain created but not registered stays on disk and must be
//! removed by the operator.
//!
//! The search-list read-modify-write is not atomic. Another process editing
//! the same list between the read and the write can lose its update.

use crate::core::gateway::StoreGateway;
use crate::core::{search_list, secret};
use crate::error::{KeychainError, Result};
use crate::models::keychain::KeychainHandle;
use crate::util::path;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zeroize::Zeroizing;

/// How far a lifecycle operation progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Created,
    Registered,
    Unlocked,
    Deregistered,
    Deleted,
}

pub struct Lifecycle<'a> {
    gateway: StoreGateway<'a>,
    stage: Stage,
}

impl<'a> Lifecycle<'a> {
    pub fn new(gateway: StoreGateway<'a>) -> Self {
        Self {
            gateway,
            stage: Stage::Start,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Create, register, and unlock a keychain at `path`.
    ///
    /// Uses `supplied` as the secret when given, otherwise generates one.
    /// Returns the absolute path of the new keychain.
    pub fn create(&mut self, path: &Path, supplied: Option<Zeroizing<String>>) -> Result<PathBuf> {
        self.stage = Stage::Start;
        let handle = KeychainHandle::new(resolve_path(path)?, Some(secret::resolve(supplied)));
        info!("Creating keychain '{}'...", handle.path().display());

        let result = self.run_create(&handle);
        if let Err(e) = &result {
            if matches!(self.stage, Stage::Created | Stage::Registered) {
                warn!(
                    "keychain '{}' was left behind after {:?}; remove it with delete-keychain ({})",
                    handle.path().display(),
                    self.stage,
                    e
                );
            }
        }
        result.map(|()| handle.path().to_path_buf())
    }

    fn run_create(&mut self, handle: &KeychainHandle) -> Result<()> {
        let path = handle.path();
        let secret = handle.secret().unwrap_or_default();

        self.gateway.create_store(path, secret)?;
        self.stage = Stage::Created;
        self.gateway.apply_lock_timeout(path)?;

        self.register(path)?;
        self.stage = Stage::Registered;

        self.gateway.unlock_store(path, secret)?;
        self.stage = Stage::Unlocked;
        info!("Keychain '{}' is ready", path.display());
        Ok(())
    }

    /// Remove `path` from the search list, then destroy the keychain.
    pub fn delete(&mut self, path: &Path) -> Result<PathBuf> {
        self.stage = Stage::Start;
        let path = resolve_path(path)?;
        info!("Deleting keychain '{}'...", path.display());

        self.deregister(&path)?;
        self.stage = Stage::Deregistered;

        self.gateway.delete_store(&path)?;
        self.stage = Stage::Deleted;
        Ok(path)
    }

    fn register(&self, path: &Path) -> Result<()> {
        let current = self.gateway.list_active_stores()?;
        let updated = search_list::with_appended(&current, path);
        self.gateway.set_active_stores(&updated)
    }

    fn deregister(&self, path: &Path) -> Result<()> {
        let current = self.gateway.list_active_stores()?;
        match search_list::without(&current, path) {
            Some(updated) => self.gateway.set_active_stores(&updated),
            None => Ok(()),
        }
    }
}

fn resolve_path(p: &Path) -> Result<PathBuf> {
    if p.as_os_str().is_empty() {
        return Err(KeychainError::Usage("keychain path cannot be empty".into()));
    }
    path::absolutize(p)
        .map_err(|e| KeychainError::Usage(format!("resolve {}: {}", p.display(), e)))
}
