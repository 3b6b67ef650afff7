//! jsondoc: write JSON documentation for a resolved symbol graph.
//!
//! Reads one or more symbol-graph files and writes one JSON file per type
//! plus an `index.json` per directory:
//!
//! `jsondoc -d build/docs --pretty symbols/*.json`

use anyhow::{Context, Result};
use clap::Parser;
use jsondoc::config::DEFAULT_OUTPUT_DIR;
use jsondoc::{GeneratorConfig, SymbolGraph};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsondoc",
    version,
    about = "Generate a tree of JSON documentation files from symbol-graph files"
)]
struct Cli {
    /// Symbol-graph files, directories or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Destination directory for generated JSON files
    #[arg(short = 'd', long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Pretty print generated JSON files
    #[arg(long)]
    pretty: bool,

    /// Include private members in output
    #[arg(long)]
    include_private: bool,

    /// Skip packages and types whose qualified name matches this regex.
    /// Can be specified multiple times.
    #[arg(long)]
    exclude: Vec<String>,

    /// Log every file written
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let inputs = collect_inputs(&cli.inputs)?;
    if inputs.is_empty() {
        anyhow::bail!("no symbol-graph files found");
    }
    let graph = SymbolGraph::load(&inputs).context("failed to load symbol graph")?;

    let config = GeneratorConfig::new(&cli.output)
        .pretty(cli.pretty)
        .include_private(cli.include_private)
        .exclude(&cli.exclude)?;

    let report = jsondoc::generate(&graph, &config)?;
    if !report.is_success() {
        anyhow::bail!(
            "documentation generation failed for {} item(s); partial output left in {}",
            report.failures.len(),
            cli.output.display()
        );
    }
    Ok(())
}

/// Log to stderr. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "jsondoc=debug" } else { "jsondoc=info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

/// Symbol-graph files found in each directory input (top level only).
const GRAPH_FILE_PATTERN: &str = "*.json";

/// Resolve every input argument to symbol-graph files. The result is sorted
/// and free of duplicates, which fixes the order graphs are merged in.
fn collect_inputs(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut inputs = BTreeSet::new();
    for arg in args {
        let found = resolve_input(arg)?;
        if found.is_empty() {
            warn!(input = %arg, "no symbol-graph files found for input");
        }
        inputs.extend(found);
    }
    Ok(inputs.into_iter().collect())
}

/// A file is taken as given, a directory contributes its `*.json` files and
/// anything else is read as a glob pattern.
fn resolve_input(arg: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(arg);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let pattern = if path.is_dir() {
        let dir = glob::Pattern::escape(&path.to_string_lossy());
        format!("{}/{}", dir.trim_end_matches('/'), GRAPH_FILE_PATTERN)
    } else {
        arg.to_string()
    };
    let matches = glob::glob(&pattern)
        .with_context(|| format!("invalid input pattern: {arg}"))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    Ok(matches)
}
