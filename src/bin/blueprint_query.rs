//! Query a blueprint library from the command line.
//!
//! Usage:
//!   blueprint-query --file blueprints.json --filter 'vehicle.*'
//!   blueprint-query --file blueprints.json --attribute color=blue --json
//!   blueprint-query --key vehicle.audi.tt < blueprints.ndjson
//!
//! Definitions come from `--file`, then `BLUEPRINT_LIBRARY_PATH`, then stdin.
//! Tag filters apply first, in order, followed by attribute filters. Results
//! go to stdout (one key per line, or JSON with `--json`); logs go to stderr.

use anyhow::{Context, Result, anyhow};
use blueprint_catalog::{
    Blueprint, BlueprintLibrary, LIBRARY_PATH_ENV, load_definitions_from_path,
    parse_definition_stream,
};
use clap::{Parser, ValueEnum};
use std::env;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "blueprint-query")]
#[command(about = "Filter and look up blueprints from a definitions file")]
struct Cli {
    /// Definitions file (JSON array or NDJSON); falls back to $BLUEPRINT_LIBRARY_PATH, then stdin.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Wildcard pattern matched against keys and tags; repeatable.
    #[arg(long = "filter", value_name = "PATTERN")]
    filters: Vec<String>,
    /// Attribute filter as NAME=VALUE; repeatable.
    #[arg(long = "attribute", value_name = "NAME=VALUE", value_parser = parse_attribute_filter)]
    attributes: Vec<(String, String)>,
    /// Print only the blueprint with this key; fails when absent.
    #[arg(long, conflicts_with = "index")]
    key: Option<String>,
    /// Print only the blueprint at this position in key order; fails when out of range.
    #[arg(long)]
    index: Option<usize>,
    /// Emit JSON instead of one key per line.
    #[arg(long)]
    json: bool,
    /// Log level for stderr diagnostics; RUST_LOG directives are added on top.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);
    if let Err(err) = run(cli) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn initialize_tracing(level: LogLevel) {
    let mut filter = EnvFilter::new(level.to_filter_directive());
    let mut rejected = Vec::new();
    if let Ok(extra) = env::var("RUST_LOG") {
        for directive in extra.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.parse() {
                Ok(parsed) => filter = filter.add_directive(parsed),
                Err(err) => rejected.push(format!("{directive}: {err}")),
            }
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
    for reason in rejected {
        tracing::warn!("ignoring invalid RUST_LOG directive {reason}");
    }
}

fn run(cli: Cli) -> Result<()> {
    let library = load_library(cli.file)?;
    tracing::info!(count = library.len(), "loaded blueprint library");

    let library = cli
        .filters
        .iter()
        .fold(library, |lib, pattern| lib.filter(pattern));
    let library = cli
        .attributes
        .iter()
        .fold(library, |lib, (name, value)| lib.filter_by_attribute(name, value));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(key) = cli.key.as_deref() {
        let blueprint = library.at(key)?;
        write_one(&mut out, blueprint, cli.json)?;
    } else if let Some(index) = cli.index {
        let blueprint = library.at_index(index)?;
        write_one(&mut out, blueprint, cli.json)?;
    } else if cli.json {
        let all: Vec<&Blueprint> = library.iter().collect();
        serde_json::to_writer_pretty(&mut out, &all).context("serializing blueprints")?;
        writeln!(out)?;
    } else {
        for key in library.keys() {
            writeln!(out, "{key}")?;
        }
    }
    Ok(())
}

fn load_library(file: Option<PathBuf>) -> Result<BlueprintLibrary> {
    let path = file.or_else(|| {
        env::var_os(LIBRARY_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });
    let definitions = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading blueprint definitions");
            load_definitions_from_path(&path)?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading blueprint definitions from stdin")?;
            parse_definition_stream(&buf)?
        }
    };
    Ok(BlueprintLibrary::from_definitions(definitions))
}

fn write_one(out: &mut impl Write, blueprint: &Blueprint, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, blueprint).context("serializing blueprint")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", blueprint.key())?;
    }
    Ok(())
}

fn parse_attribute_filter(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{raw}'"))?;
    if name.trim().is_empty() {
        return Err(anyhow!("attribute name must not be empty in '{raw}'"));
    }
    Ok((name.trim().to_string(), value.to_string()))
}
