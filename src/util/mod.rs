//! Utility modules for paths and the `security` subprocess.

pub mod path;
pub mod security;
