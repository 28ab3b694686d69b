//! CLI routing and command dispatch.

use crate::constants;
use crate::core::config::Settings;
use crate::core::engine::KeychainEngine;
use crate::core::gateway::StoreGateway;
use crate::error::KeychainError;
use crate::logging;
use anyhow::Result;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use tracing::error;

pub mod keychain;
pub mod registry;

use registry::{ArgumentSpec, CommandRegistry, Invocation, ParsedArgs, Target};

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub settings: Settings,
    pub engine: Box<dyn KeychainEngine>,
    pub stdin: Box<dyn Read>,
    pub stdout: Box<dyn Write>,
}

impl CliContext {
    /// Context wired to the real engine and process streams.
    pub fn from_globals(globals: &ParsedArgs) -> Result<Self> {
        let settings = Settings::resolve(
            globals.path("config").as_deref(),
            globals.path("security-bin"),
        )?;
        let engine = Box::new(settings.engine());
        Ok(Self {
            settings,
            engine,
            stdin: Box::new(io::stdin()),
            stdout: Box::new(io::stdout()),
        })
    }

    pub fn gateway(&self) -> StoreGateway<'_> {
        StoreGateway::new(self.engine.as_ref(), self.settings.lock_timeout_secs)
    }
}

/// Every command this binary knows, plus the global options.
pub fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new(
        "temp-keychain",
        "Create and register a temporary keychain for development",
    )
    .version(env!("CARGO_PKG_VERSION"));
    registry
        .global(
            ArgumentSpec::option("config")
                .env(constants::CONFIG_ENV)
                .help("Path to a TOML config file"),
        )
        .global(
            ArgumentSpec::option("security-bin")
                .env(constants::SECURITY_BIN_ENV)
                .help("Keychain engine binary (default: security)"),
        )
        .global(
            ArgumentSpec::switch("verbose")
                .short('v')
                .help("Log each engine call"),
        );
    keychain::register(&mut registry);
    registry
}

/// Parse `argv`, run the selected command, and report the exit status.
pub fn run<I, T>(argv: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let registry = build_registry();
    let invocation = match registry.resolve(argv) {
        Ok(invocation) => invocation,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1));
        }
    };
    logging::init(invocation.globals.flag("verbose"));
    ExitCode::from(dispatch(invocation, CliContext::from_globals))
}

/// Run the resolved command and return the process exit status.
///
/// The context is only built once a registered command has been selected,
/// so a missing or unknown command never touches the engine.
pub fn dispatch<F>(invocation: Invocation<'_>, make_context: F) -> u8
where
    F: FnOnce(&ParsedArgs) -> Result<CliContext>,
{
    let (spec, args) = match invocation.target {
        Target::Missing => {
            error!("No command specified.");
            return 1;
        }
        Target::Unknown(name) => {
            error!("Unknown command '{}'.", name);
            return 1;
        }
        Target::Command(spec, args) => (spec, args),
    };

    let result = make_context(&invocation.globals).and_then(|mut ctx| {
        let handler = spec.handler();
        handler(&mut ctx, &args)
    });
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{}: {:#}", spec.name(), err);
            exit_status(&err)
        }
    }
}

/// Exit status for a failed command, taken from the first typed error in the chain.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<KeychainError>())
        .map(KeychainError::exit_status)
        .unwrap_or(1)
}
