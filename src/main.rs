//! refdoc — render control reference pages from XML documentation comments
//! merged with annotated client scripts.
//!
//! - `refdoc index` lists the documented controls
//! - `refdoc type SliderExtender` renders one control's page
//! - `refdoc markup` renders every control into one document
//! - `refdoc parse Scripts/*.js` dumps what the comment parser sees

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use refdoc::parser::client::{self, ClientMembers};
use refdoc::render::{self, Renderer};
use refdoc::{Config, ReferenceService};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "refdoc",
    about = "Generate control reference documentation from XML doc comments and client scripts"
)]
struct Cli {
    /// Configuration file
    #[arg(short = 'c', long, default_value = "reference.toml", global = true)]
    config: PathBuf,

    /// Output format: markdown (default), wiki, json
    #[arg(short = 'f', long, default_value = "markdown", global = true)]
    format: String,

    /// Output directory. Prints to stdout when omitted.
    #[arg(short = 'o', long, global = true)]
    output: Option<PathBuf>,

    /// Log debug output to stderr (overrides REFDOC_LOG)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the documented types
    Index,
    /// Render reference pages for the named types
    Type {
        #[arg(required_unless_present = "all")]
        names: Vec<String>,
        /// Render every indexed type
        #[arg(long)]
        all: bool,
    },
    /// Render every documented type into one document
    Markup,
    /// Print the members parsed from client scripts as JSON (glob patterns supported)
    Parse {
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // `parse` always prints JSON and ignores --format.
    if let Command::Parse { files } = &cli.command {
        return parse_mode(files);
    }

    // Built once; every command borrows it through the service.
    let renderer = render::create_renderer(&cli.format)?;

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    let service = ReferenceService::new(config, renderer);

    match &cli.command {
        Command::Index => {
            let out = service.index()?;
            emit(&cli, service.renderer(), "index", &out)?;
        }
        Command::Type { names, all } => {
            let names = if *all { service.type_names()? } else { names.clone() };
            for name in &names {
                let out = service
                    .type_page(name)
                    .with_context(|| format!("failed to render {}", name))?;
                emit(&cli, service.renderer(), name, &out)?;
            }
        }
        Command::Markup => {
            let out = service.markup()?;
            emit(&cli, service.renderer(), "reference", &out)?;
        }
        Command::Parse { .. } => {}
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("REFDOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print to stdout, or write `<name>.<ext>` into the output directory.
fn emit(cli: &Cli, renderer: &dyn Renderer, name: &str, content: &str) -> Result<()> {
    let Some(output_dir) = cli.output.as_deref() else {
        println!("{}", content);
        return Ok(());
    };

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;
    let out_path = output_dir.join(format!("{}.{}", name, renderer.file_extension()));
    fs::write(&out_path, content)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    Ok(())
}

/// parse mode: run the client comment parser over scripts, print JSON.
fn parse_mode(patterns: &[String]) -> Result<()> {
    let mut parsed: BTreeMap<String, ClientMembers> = BTreeMap::new();
    for path in expand_globs(patterns)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let lines: Vec<&str> = content.lines().collect();
        parsed.insert(path.to_string_lossy().to_string(), client::parse_file(&lines));
    }
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

/// File extensions recognized as client scripts.
const SUPPORTED_EXTENSIONS: &[&str] = &["js"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for script files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let supported = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
                if p.is_file() && supported {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}
