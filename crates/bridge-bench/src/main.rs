use std::path::PathBuf;

use clap::Parser;

use bridge_bench::config::{BenchmarkConfig, ResolvedOutputs};
use bridge_bench::logging::init_logging;
use bridge_bench::runner::DealRunner;

/// Self-play harness for the bridge engine and its rule-based players.
#[derive(Debug, Parser)]
#[command(
    name = "bridge-bench",
    author,
    version,
    about = "Deterministic bridge self-play harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of boards to play.
    #[arg(long, value_name = "DEALS")]
    deals: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no boards are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(deals) = cli.deals {
        config.deals.count = deals;
    }

    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let deals = config.deals.count;

    println!(
        "Loaded configuration '{run_id}' ({deals} board{}, {} bots)",
        if deals == 1 { "" } else { "s" },
        config.bots.difficulty().as_str()
    );

    if cli.validate_only {
        println!("Validation-only mode: no boards played.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = DealRunner::new(config, outputs)?;
    let summary = runner.run()?;

    println!(
        "Run complete for '{run_id}': {} boards ({} passed out) → {} rows at {}",
        summary.boards_played,
        summary.passed_out,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!(
        "Totals: North-South {} / East-West {}",
        summary.north_south, summary.east_west
    );
    println!(
        "Replays verified: {}/{}",
        summary.replays_verified, summary.boards_played
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(dir) = summary.events_dir.as_ref() {
        println!("Event logs: {}", dir.display());
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
