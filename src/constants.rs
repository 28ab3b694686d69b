//! Centralized constants for the engine, secrets, and environment.

/// Default engine binary (macOS `security(1)`).
pub const DEFAULT_SECURITY_BIN: &str = "security";

/// Default preference domain for the keychain search list.
pub const DEFAULT_DOMAIN: &str = "user";

/// Valid preference domains accepted by `security list-keychains -d`.
pub const VALID_DOMAINS: &[&str] = &["user", "system", "common", "dynamic"];

/// Seconds of inactivity before a temporary keychain locks itself (6 hours).
pub const DEFAULT_LOCK_TIMEOUT_SECS: u32 = 21_600;

/// Random bytes in a generated secret (hex-encoded to twice this length).
pub const SECRET_BYTES: usize = 32;

/// Maximum size in bytes of a secret read from stdin (64 KiB).
pub const MAX_SECRET_SIZE: usize = 65_536;

/// Environment variable selecting a config file.
pub const CONFIG_ENV: &str = "TEMP_KEYCHAIN_CONFIG";

/// Environment variable overriding the engine binary.
pub const SECURITY_BIN_ENV: &str = "TEMP_KEYCHAIN_SECURITY_BIN";

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "TEMP_KEYCHAIN_LOG";
