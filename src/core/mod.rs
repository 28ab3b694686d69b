//! Core logic: keychain lifecycle, engine seam, secrets, settings.

pub mod config;
pub mod engine;
pub mod gateway;
pub mod lifecycle;
pub mod search_list;
pub mod secret;
