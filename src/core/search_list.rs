//! Pure edits of the keychain search list.
//!
//! The engine only supports replacing the whole list, so every change is
//! computed here from a full read and written back in full.

use std::path::{Path, PathBuf};

/// `current` with `path` present exactly once, at the end.
pub fn with_appended(current: &[PathBuf], path: &Path) -> Vec<PathBuf> {
    let mut updated: Vec<PathBuf> = current.iter().filter(|p| *p != path).cloned().collect();
    updated.push(path.to_path_buf());
    updated
}

/// `current` without any occurrence of `path`, or `None` if it was absent.
pub fn without(current: &[PathBuf], path: &Path) -> Option<Vec<PathBuf>> {
    if !current.iter().any(|p| p == path) {
        return None;
    }
    Some(current.iter().filter(|p| *p != path).cloned().collect())
}
