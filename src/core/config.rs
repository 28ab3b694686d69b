//! Settings resolution: command line > config file > built-in defaults.

use crate::constants;
use crate::models::config::ConfigFile;
use crate::util::security::SecurityTool;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub program: PathBuf,
    pub program_args: Vec<String>,
    pub domain: String,
    pub lock_timeout_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            program: PathBuf::from(constants::DEFAULT_SECURITY_BIN),
            program_args: Vec::new(),
            domain: constants::DEFAULT_DOMAIN.to_string(),
            lock_timeout_secs: constants::DEFAULT_LOCK_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Resolve settings from an optional config file and an optional
    /// engine-binary override (`--security-bin` or its env var).
    pub fn resolve(config: Option<&Path>, program_override: Option<PathBuf>) -> Result<Self> {
        let mut settings = match config {
            Some(path) => Self::from_file(&load(path)?)
                .with_context(|| format!("invalid config {}", path.display()))?,
            None => Self::default(),
        };
        if let Some(program) = program_override {
            settings.program = program;
        }
        Ok(settings)
    }

    pub fn from_file(file: &ConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let domain = file.engine.domain.clone().unwrap_or(defaults.domain);
        if !constants::VALID_DOMAINS.contains(&domain.as_str()) {
            bail!(
                "invalid domain '{}', must be one of: {}",
                domain,
                constants::VALID_DOMAINS.join(", ")
            );
        }
        Ok(Self {
            program: file
                .engine
                .program
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(defaults.program),
            program_args: file.engine.args.clone(),
            domain,
            lock_timeout_secs: file
                .keychain
                .lock_timeout_secs
                .unwrap_or(defaults.lock_timeout_secs),
        })
    }

    /// The engine adapter these settings describe.
    pub fn engine(&self) -> SecurityTool {
        SecurityTool::new(
            self.program.clone(),
            self.program_args.clone(),
            self.domain.clone(),
        )
    }
}

pub fn load(path: &Path) -> Result<ConfigFile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))
}
