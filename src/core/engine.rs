//! The seam between keychain orchestration and the OS keychain engine.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Raw operations exposed by the external keychain engine.
///
/// Implementations run one engine invocation per call and block until it
/// exits. A non-zero exit must surface as `KeychainError::ExternalTool`.
pub trait KeychainEngine {
    /// Lines printed by the engine's search-list query, still quoted.
    fn list_active(&self) -> Result<Vec<String>>;

    fn create(&self, path: &Path, password: &str) -> Result<()>;

    /// Lock on sleep and after `seconds` of inactivity.
    fn set_lock_timeout(&self, path: &Path, seconds: u32) -> Result<()>;

    /// Replace the whole search list.
    fn set_active(&self, paths: &[PathBuf]) -> Result<()>;

    fn unlock(&self, path: &Path, password: &str) -> Result<()>;

    fn delete(&self, path: &Path) -> Result<()>;
}
