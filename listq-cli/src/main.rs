//! listq: check list query parameters against a resource registry.
//!
//! Usage:
//!   listq check --resource users --sort "created_at DESC" --filter "age>=18"
//!   listq query --resource users "fields=id,email&filter=age%3E%3D18"
//!   listq resources
//!
//! Exit status is 0 when everything is accepted and 1 when any parameter is
//! rejected or the registry cannot be loaded.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use listq::{Diagnostic, ListQuery, Param, Registry, Resource, ValidationError};
use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "listq")]
#[command(about = "Validate fields/sort/filter list parameters against column allow-lists")]
#[command(version)]
struct Cli {
    /// Resource registry file (TOML)
    #[arg(short, long, global = true, env = "LISTQ_CONFIG", default_value = "listq.toml")]
    config: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate raw parameter values
    Check {
        /// Resource whose allow-list applies
        #[arg(short, long)]
        resource: String,

        /// Column projection, e.g. "id, name"
        #[arg(long)]
        fields: Option<String>,

        /// Sort expression, e.g. "created_at DESC, id ASC"
        #[arg(long)]
        sort: Option<String>,

        /// Filter expression, e.g. "age>=18 AND name='Ann'"
        #[arg(long)]
        filter: Option<String>,
    },

    /// Extract and validate the list parameters of a URL query string
    Query {
        /// Resource whose allow-list applies
        #[arg(short, long)]
        resource: String,

        /// Query string, with or without a leading path and `?`
        query: String,
    },

    /// List registered resources and their columns
    Resources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(miniserde::Serialize)]
struct Accepted {
    param: String,
    valid: bool,
    normalized: String,
}

#[derive(miniserde::Serialize)]
struct ResourceLine {
    name: String,
    columns: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let accepted = run(&cli, &mut io::stdout().lock())?;
    Ok(if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Execute a command, writing results to `out`. Returns whether every
/// checked parameter was accepted.
fn run(cli: &Cli, out: &mut impl Write) -> Result<bool> {
    let registry = Registry::load(&cli.config)
        .with_context(|| format!("failed to load registry from {}", cli.config.display()))?;
    listq::log!(info, "registry loaded", path: cli.config.display(), resources: registry.len());

    match &cli.command {
        Command::Check {
            resource,
            fields,
            sort,
            filter,
        } => {
            let resource = registry.resource(resource)?;
            check(
                cli.format,
                resource,
                fields.as_deref(),
                sort.as_deref(),
                filter.as_deref(),
                out,
            )
        },
        Command::Query { resource, query } => {
            let resource = registry.resource(resource)?;
            let query = ListQuery::from_query_string(query).context("failed to decode query string")?;
            match query.validate(resource) {
                Ok(validated) => {
                    report(cli.format, Param::Fields, Ok(&validated.fields), out)?;
                    report(cli.format, Param::Sort, Ok(&validated.sort), out)?;
                    report(cli.format, Param::Filter, Ok(&validated.filter), out)?;
                    Ok(true)
                },
                Err(err) => {
                    report::<&str>(cli.format, err.param, Err(&err.error), out)?;
                    Ok(false)
                },
            }
        },
        Command::Resources => {
            list_resources(cli.format, &registry, out)?;
            Ok(true)
        },
    }
}

/// Validate each given parameter on its own so every rejection is reported.
fn check(
    format: Format,
    resource: &Resource,
    fields: Option<&str>,
    sort: Option<&str>,
    filter: Option<&str>,
    out: &mut impl Write,
) -> Result<bool> {
    let mut accepted = true;
    if let Some(raw) = fields {
        accepted &= report(format, Param::Fields, resource.validate_fields(raw).as_ref(), out)?;
    }
    if let Some(raw) = sort {
        accepted &= report(format, Param::Sort, resource.validate_sort(raw).as_ref(), out)?;
    }
    if let Some(raw) = filter {
        accepted &= report(format, Param::Filter, resource.validate_filter(raw).as_ref(), out)?;
    }
    Ok(accepted)
}

/// Write one result line. Returns whether the parameter was accepted.
fn report<T: Display>(
    format: Format,
    param: Param,
    result: Result<T, &ValidationError>,
    out: &mut impl Write,
) -> Result<bool> {
    match (format, result) {
        (Format::Text, Ok(expr)) => {
            let normalized = expr.to_string();
            if normalized.is_empty() {
                writeln!(out, "{param}: ok (empty)")?;
            } else {
                writeln!(out, "{param}: ok: {normalized}")?;
            }
            Ok(true)
        },
        (Format::Text, Err(err)) => {
            writeln!(out, "{param}: rejected: {err}")?;
            Ok(false)
        },
        (Format::Json, Ok(expr)) => {
            let line = Accepted {
                param: param.as_str().to_string(),
                valid: true,
                normalized: expr.to_string(),
            };
            writeln!(out, "{}", miniserde::json::to_string(&line))?;
            Ok(true)
        },
        (Format::Json, Err(err)) => {
            let diag = Diagnostic::from(err).with_param(param.as_str());
            writeln!(out, "{}", diag.to_json())?;
            Ok(false)
        },
    }
}

fn list_resources(format: Format, registry: &Registry, out: &mut impl Write) -> Result<()> {
    for resource in registry.iter() {
        match format {
            Format::Text => writeln!(out, "{}: {}", resource.name, resource.columns.join(", "))?,
            Format::Json => {
                let line = ResourceLine {
                    name: resource.name.clone(),
                    columns: resource.columns.clone(),
                };
                writeln!(out, "{}", miniserde::json::to_string(&line))?;
            },
        }
    }
    Ok(())
}
