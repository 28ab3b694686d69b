//! Keychain commands: create, delete, and inspect the search list.

use crate::cli::registry::{ArgumentSpec, CommandRegistry, ParsedArgs};
use crate::cli::CliContext;
use crate::core::lifecycle::Lifecycle;
use crate::core::secret;
use crate::error::KeychainError;
use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

pub fn register(registry: &mut CommandRegistry) {
    registry
        .register(
            "create-keychain",
            "Safely create a temporary keychain",
            vec![
                ArgumentSpec::positional("path").help("path at which to create the keychain"),
                ArgumentSpec::switch("password")
                    .short('p')
                    .help("read password from stdin"),
            ],
            run_create,
        )
        .register(
            "delete-keychain",
            "Safely delete a temporary keychain removing it from the active set",
            vec![ArgumentSpec::positional("path").help("path of the keychain to delete")],
            run_delete,
        )
        .register(
            "list-keychains",
            "Show the active keychain search list",
            vec![ArgumentSpec::option("format")
                .default_value("table")
                .help("output format: table|json")],
            run_list,
        );
}

fn run_create(ctx: &mut CliContext, args: &ParsedArgs) -> Result<()> {
    let path = PathBuf::from(args.required("path")?);
    let supplied = if args.flag("password") {
        Some(secret::read_supplied(&mut ctx.stdin)?)
    } else {
        None
    };

    let created = Lifecycle::new(ctx.gateway())
        .create(&path, supplied)
        .with_context(|| format!("create keychain {}", path.display()))?;

    writeln!(ctx.stdout, "Created {}", created.display()).context("write to stdout")?;
    Ok(())
}

fn run_delete(ctx: &mut CliContext, args: &ParsedArgs) -> Result<()> {
    let path = PathBuf::from(args.required("path")?);

    let deleted = Lifecycle::new(ctx.gateway())
        .delete(&path)
        .with_context(|| format!("delete keychain {}", path.display()))?;

    writeln!(ctx.stdout, "Deleted {}", deleted.display()).context("write to stdout")?;
    Ok(())
}

#[derive(Serialize)]
struct ListItem {
    position: usize,
    path: String,
    exists: bool,
}

fn run_list(ctx: &mut CliContext, args: &ParsedArgs) -> Result<()> {
    let format = args.value("format").unwrap_or("table");
    if format != "table" && format != "json" {
        return Err(
            KeychainError::Usage(format!("invalid format: {} (use table|json)", format)).into(),
        );
    }

    let items: Vec<ListItem> = ctx
        .gateway()
        .list_active_stores()?
        .into_iter()
        .enumerate()
        .map(|(i, path)| ListItem {
            position: i + 1,
            exists: path.exists(),
            path: path.display().to_string(),
        })
        .collect();

    if format == "json" {
        let json = serde_json::to_string_pretty(&items).context("serialize list")?;
        writeln!(ctx.stdout, "{}", json).context("write to stdout")?;
        return Ok(());
    }

    if items.is_empty() {
        writeln!(ctx.stdout, "No keychains in the search list").context("write to stdout")?;
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Path").add_attribute(Attribute::Bold),
        Cell::new("On disk").add_attribute(Attribute::Bold),
    ]);
    for item in items {
        table.add_row(vec![
            item.position.to_string(),
            item.path,
            (if item.exists { "yes" } else { "no" }).to_string(),
        ]);
    }

    writeln!(ctx.stdout, "{}", table).context("write to stdout")?;
    Ok(())
}
