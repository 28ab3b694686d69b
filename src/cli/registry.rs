//! Declarative command table: name -> help, argument specs, handler.
//!
//! The registry is plain data assembled at startup; `parser()` turns it
//! into a `clap::Command` and `resolve()` maps an argument vector back to
//! the registered handler.

use crate::cli::CliContext;
use crate::error::KeychainError;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

pub type Handler = fn(&mut CliContext, &ParsedArgs) -> anyhow::Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgKind {
    Positional,
    Option,
    Switch,
}

/// One argument of a command.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    id: &'static str,
    kind: ArgKind,
    short: Option<char>,
    help: Option<&'static str>,
    default: Option<&'static str>,
    env: Option<&'static str>,
    required: bool,
}

impl ArgumentSpec {
    fn new(id: &'static str, kind: ArgKind, required: bool) -> Self {
        Self {
            id,
            kind,
            short: None,
            help: None,
            default: None,
            env: None,
            required,
        }
    }

    /// A required positional value.
    pub fn positional(id: &'static str) -> Self {
        Self::new(id, ArgKind::Positional, true)
    }

    /// An optional `--id <VALUE>` string flag.
    pub fn option(id: &'static str) -> Self {
        Self::new(id, ArgKind::Option, false)
    }

    /// A boolean `--id` toggle.
    pub fn switch(id: &'static str) -> Self {
        Self::new(id, ArgKind::Switch, false)
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn env(mut self, var: &'static str) -> Self {
        self.env = Some(var);
        self
    }

    /// Reject the command line when this option is absent.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.id);
        arg = match self.kind {
            ArgKind::Positional => arg
                .action(ArgAction::Set)
                .required(self.required && self.default.is_none()),
            ArgKind::Option => arg
                .long(self.id)
                .action(ArgAction::Set)
                .required(self.required),
            ArgKind::Switch => arg.long(self.id).action(ArgAction::SetTrue),
        };
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(help) = self.help {
            arg = arg.help(help);
        }
        if let Some(default) = self.default {
            arg = arg.default_value(default);
        }
        if let Some(var) = self.env {
            arg = arg.env(var);
        }
        arg
    }
}

/// A registered command. Immutable once in the registry.
pub struct CommandSpec {
    name: &'static str,
    help: &'static str,
    arguments: Vec<ArgumentSpec>,
    handler: Handler,
}

impl CommandSpec {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Parsed values for one command (or the global options).
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    matches: ArgMatches,
}

impl ParsedArgs {
    fn new(matches: ArgMatches) -> Self {
        Self { matches }
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    pub fn path(&self, id: &str) -> Option<PathBuf> {
        self.value(id).map(PathBuf::from)
    }

    pub fn flag(&self, id: &str) -> bool {
        self.matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    pub fn required(&self, id: &str) -> Result<&str, KeychainError> {
        self.value(id)
            .ok_or_else(|| KeychainError::Usage(format!("missing argument <{}>", id)))
    }
}

#[derive(Debug)]
pub enum Target<'r> {
    Command(&'r CommandSpec, ParsedArgs),
    /// A subcommand token that matches no registration.
    Unknown(String),
    /// No subcommand token at all.
    Missing,
}

#[derive(Debug)]
pub struct Invocation<'r> {
    pub globals: ParsedArgs,
    pub target: Target<'r>,
}

pub struct CommandRegistry {
    name: &'static str,
    about: &'static str,
    version: Option<&'static str>,
    globals: Vec<ArgumentSpec>,
    commands: BTreeMap<&'static str, CommandSpec>,
}

impl CommandRegistry {
    pub fn new(name: &'static str, about: &'static str) -> Self {
        Self {
            name,
            about,
            version: None,
            globals: Vec::new(),
            commands: BTreeMap::new(),
        }
    }

    pub fn version(mut self, version: &'static str) -> Self {
        self.version = Some(version);
        self
    }

    /// Add an option accepted before or after any command.
    pub fn global(&mut self, argument: ArgumentSpec) -> &mut Self {
        self.globals.push(argument);
        self
    }

    /// Register a command. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(
        &mut self,
        name: &'static str,
        help: &'static str,
        arguments: Vec<ArgumentSpec>,
        handler: Handler,
    ) -> &mut Self {
        self.commands.insert(
            name,
            CommandSpec {
                name,
                help,
                arguments,
                handler,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn parser(&self) -> Command {
        let mut cmd = Command::new(self.name)
            .about(self.about)
            .allow_external_subcommands(true);
        if let Some(version) = self.version {
            cmd = cmd.version(version);
        }
        for global in &self.globals {
            cmd = cmd.arg(global.to_arg().global(true));
        }
        for spec in self.commands.values() {
            let mut sub = Command::new(spec.name).about(spec.help);
            for argument in &spec.arguments {
                sub = sub.arg(argument.to_arg());
            }
            cmd = cmd.subcommand(sub);
        }
        cmd
    }

    /// Parse `argv` (program name first) and select the command to run.
    ///
    /// Errors are clap's usage, help, and version outcomes; the caller
    /// prints them and exits with `Error::exit_code()`.
    pub fn resolve<I, T>(&self, argv: I) -> Result<Invocation<'_>, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.parser().try_get_matches_from(argv)?;
        let target = match matches.subcommand() {
            None => Target::Missing,
            Some((name, sub)) => match self.get(name) {
                Some(spec) => Target::Command(spec, ParsedArgs::new(sub.clone())),
                None => Target::Unknown(name.to_string()),
            },
        };
        Ok(Invocation {
            globals: ParsedArgs::new(matches),
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn noop(_: &mut CliContext, _: &ParsedArgs) -> anyhow::Result<()> {
        Ok(())
    }

    fn other(_: &mut CliContext, _: &ParsedArgs) -> anyhow::Result<()> {
        anyhow::bail!("other")
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new("tool", "test tool");
        registry
            .global(ArgumentSpec::switch("verbose").short('v'))
            .register(
                "make",
                "make a thing",
                vec![
                    ArgumentSpec::positional("path"),
                    ArgumentSpec::switch("password").short('p'),
                    ArgumentSpec::option("format").default_value("table"),
                ],
                noop,
            );
        registry
    }

    #[test]
    fn test_resolve_matches_command_and_arguments() {
        let registry = registry();
        let invocation = registry
            .resolve(["tool", "make", "out/ci.keychain", "--password"])
            .unwrap();
        match invocation.target {
            Target::Command(spec, args) => {
                assert_eq!(spec.name(), "make");
                assert_eq!(args.value("path"), Some("out/ci.keychain"));
                assert_eq!(args.path("path"), Some(PathBuf::from("out/ci.keychain")));
                assert!(args.flag("password"));
                assert_eq!(args.value("format"), Some("table"));
            }
            other => panic!("unexpected target: {other:?}"),
        }
    }

    #[test]
    fn test_short_switch_and_defaults() {
        let registry = registry();
        let invocation = registry.resolve(["tool", "make", "-p", "x"]).unwrap();
        let Target::Command(_, args) = invocation.target else {
            panic!("expected command");
        };
        assert!(args.flag("password"));

        let invocation = registry.resolve(["tool", "make", "x"]).unwrap();
        let Target::Command(_, args) = invocation.target else {
            panic!("expected command");
        };
        assert!(!args.flag("password"));
    }

    #[test]
    fn test_no_command_is_missing() {
        let registry = registry();
        let invocation = registry.resolve(["tool"]).unwrap();
        assert!(matches!(invocation.target, Target::Missing));
    }

    #[test]
    fn test_unregistered_command_is_unknown() {
        let registry = registry();
        let invocation = registry.resolve(["tool", "frobnicate", "x"]).unwrap();
        match invocation.target {
            Target::Unknown(name) => assert_eq!(name, "frobnicate"),
            other => panic!("unexpected target: {other:?}"),
        }
    }

    #[test]
    fn test_missing_positional_is_usage_error() {
        let registry = registry();
        let err = registry.resolve(["tool", "make"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let registry = registry();
        let err = registry.resolve(["tool", "make", "x", "--bogus"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_global_switch_after_command() {
        let registry = registry();
        let invocation = registry.resolve(["tool", "make", "x", "-v"]).unwrap();
        assert!(invocation.globals.flag("verbose"));
    }

    #[test]
    fn test_duplicate_registration_last_wins() {
        let mut registry = registry();
        registry.register("make", "replacement", Vec::new(), other);
        assert_eq!(registry.commands().count(), 1);
        let spec = registry.get("make").unwrap();
        assert_eq!(spec.help(), "replacement");
        assert!(spec.arguments().is_empty());
        let invocation = registry.resolve(["tool", "make"]).unwrap();
        assert!(matches!(invocation.target, Target::Command(spec, _) if spec.help() == "replacement"));
    }

    #[test]
    fn test_required_reports_usage() {
        let registry = registry();
        let invocation = registry.resolve(["tool", "make", "x"]).unwrap();
        assert!(matches!(
            invocation.globals.required("path"),
            Err(KeychainError::Usage(_))
        ));
    }

    #[test]
    fn test_required_option_must_be_given() {
        let mut registry = registry();
        registry.register(
            "tag",
            "tag a thing",
            vec![ArgumentSpec::option("label").required()],
            noop,
        );
        let err = registry.resolve(["tool", "tag"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let invocation = registry.resolve(["tool", "tag", "--label", "ci"]).unwrap();
        let Target::Command(_, args) = invocation.target else {
            panic!("expected command");
        };
        assert_eq!(args.value("label"), Some("ci"));
    }

    #[test]
    fn test_parser_is_consistent() {
        registry().parser().debug_assert();
    }
}
