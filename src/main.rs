//! OpeningTrainer - rehearse opening lines from the terminal
//!
//! Usage:
//!     opening_trainer [--lines repertoire.json] [--side black] [--seed 42]
//!
//! Commands are read from stdin and answers written to stdout; logs go to
//! stderr. Type `help` for the command list.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::prelude::*;

use opening_trainer::cli::TrainerProtocol;
use opening_trainer::graph::OpeningGraph;
use opening_trainer::repertoire::Repertoire;
use opening_trainer::trainer::Side;

#[derive(Parser, Debug)]
#[command(name = "opening_trainer", version, about = "Rehearse chess opening lines")]
struct Cli {
    /// JSON repertoire file; the built-in repertoire is used when omitted
    #[arg(short, long)]
    lines: Option<PathBuf>,

    /// Side you play
    #[arg(short, long, default_value = "white")]
    side: Side,

    /// Seed for the opponent's move choice
    #[arg(long)]
    seed: Option<u64>,

    /// Log ingestion details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            tracing_subscriber::EnvFilter::new("debug")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let repertoire = match &cli.lines {
        Some(path) => Repertoire::load(path)
            .with_context(|| format!("loading repertoire from {}", path.display()))?,
        None => Repertoire::builtin(),
    };

    // A bad line is a data bug; refuse to start rather than train on it.
    let graph = OpeningGraph::from_repertoire(&repertoire).context("building opening graph")?;
    info!(positions = graph.len(), "ready");

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let names = repertoire.names().map(str::to_string).collect();

    let mut protocol = TrainerProtocol::new(&graph, cli.side, rng, names);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    protocol.run(stdin.lock(), &mut stdout)?;
    stdout.flush()?;
    Ok(())
}
