//! Headless driver: loads a process file (or the built-in demo chain), steps
//! the engine and prints the factory table at a fixed interval.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tickchain_core::builtin;
use tickchain_core::engine::Engine;
use tickchain_data::{load_file, StageDefaults};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Discrete-time production-chain simulator
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Process file to load (.json, .ron or .toml)
    #[arg(long, default_value = "processes.json")]
    config: PathBuf,

    /// Number of simulation ticks
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    /// Print state every N ticks
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Run the built-in mining and smelting chain instead of loading a file
    #[arg(long)]
    demo: bool,

    /// Print a JSON snapshot of every factory after the run
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Report after the first tick and after every `interval`-th tick.
fn should_report(tick: u64, interval: u64) -> bool {
    tick == 1 || tick % interval == 0
}

fn build(args: &Args) -> Result<(Engine, usize)> {
    if args.demo {
        let mut engine = Engine::new();
        builtin::smelting_chain(&mut engine).context("failed to build demo chain")?;
        return Ok((engine, 1));
    }
    let loaded = load_file(&args.config, StageDefaults::default())
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    Ok((loaded.engine, loaded.process_count))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    info!(?args, "starting");

    let (mut engine, process_count) = build(&args)?;
    println!(
        "Factory Simulation Started: {} factories in {} processes",
        engine.graph.factory_count(),
        process_count
    );

    for _ in 0..args.ticks {
        let report = engine.step();
        if should_report(report.tick, args.interval) {
            println!("\nTick {}:", report.tick);
            print!("{}", engine.report());
        }
    }

    println!("\nSimulation complete.");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    }
    Ok(())
}
