//! Temporary keychain CLI.
//!
//! Wraps macOS `security(1)` to create, register, unlock, and delete
//! short-lived keychains for build and CI jobs without touching the
//! operator's login keychain.
//!
//! ## Modules
//! - `cli` — Command registry, front end, and handlers
//! - `core` — Lifecycle orchestration, engine seam, secrets, settings
//! - `models` — Data structures
//! - `util` — Path handling and the `security` subprocess adapter

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod util;
