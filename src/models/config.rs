//! Config file model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub keychain: KeychainSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Engine binary; `security` on PATH when unset.
    #[serde(default)]
    pub program: Option<String>,

    /// Arguments placed before every engine subcommand (e.g. a wrapper script).
    #[serde(default)]
    pub args: Vec<String>,

    /// Preference domain for the search list.
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeychainSection {
    #[serde(default)]
    pub lock_timeout_secs: Option<u32>,
}
