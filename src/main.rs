use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use poset_store::script::{execute, parse};
use poset_store::Registry;

/// Run a JSON command script against a fresh poset registry.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script file (JSON array or one command per line); stdin when absent
    input: Option<PathBuf>,

    /// Diagnostic filter, e.g. `poset_store=debug`; falls back to RUST_LOG
    #[arg(long)]
    log: Option<String>,

    /// Pretty-print each reply
    #[arg(long, action)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(f) => EnvFilter::try_new(f).context("invalid --log filter")?,
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let buf = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let commands = parse(&buf).context("invalid command script")?;

    let mut registry = Registry::new();
    let mut out = io::stdout().lock();
    for command in &commands {
        let reply = execute(&mut registry, command);
        let line = if args.pretty {
            serde_json::to_string_pretty(&reply)?
        } else {
            serde_json::to_string(&reply)?
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}
