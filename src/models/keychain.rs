//! Keychain handle passed through a lifecycle operation.

use std::fmt;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// An absolute keychain path and, during `create`, its unlock secret.
///
/// The secret only lives in memory and is wiped when the handle drops.
pub struct KeychainHandle {
    path: PathBuf,
    secret: Option<Zeroizing<String>>,
}

impl KeychainHandle {
    pub fn new(path: PathBuf, secret: Option<Zeroizing<String>>) -> Self {
        Self { path, secret }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().map(String::as_str)
    }
}

impl fmt::Debug for KeychainHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeychainHandle")
            .field("path", &self.path)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
