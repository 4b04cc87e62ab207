//! stagesim CLI
//!
//! Run the two-stage service network simulation from the command line.
//!
//! # Example
//!
//! ```bash
//! # Reproducible run
//! stagesim -l 2.25 -p 0.02 -s 0.06 --seed 42
//!
//! # Five replications with derived seeds, averaged at the end
//! stagesim -l 2.25 -p 0.02 -s 0.06 -r 5
//! ```

use clap::Parser;
use stagesim::{run_replications, PcgStream, Report, Simulation, SimulationConfig};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Two-stage service network simulator
///
/// Simulates jobs cycling between a processing and a storage stage until a
/// fixed number of them complete. Reproducible when the same seed is used.
#[derive(Parser, Debug)]
#[command(name = "stagesim")]
#[command(version, about, long_about = None)]
struct Args {
    /// External arrivals per unit of simulated time
    #[arg(short = 'l', long)]
    arrival_rate: f64,

    /// Mean service duration at the processing stage
    #[arg(short = 'p', long)]
    processing_mean: f64,

    /// Mean service duration at the storage stage
    #[arg(short = 's', long)]
    storage_mean: f64,

    /// Random seed for reproducible results. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent replications to run
    #[arg(short = 'r', long, default_value = "1")]
    replications: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,stagesim=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> stagesim::Result<()> {
    let config = SimulationConfig::new(args.arrival_rate, args.processing_mean, args.storage_mean);
    let seed = args.seed.unwrap_or_else(rand::random);

    info!(
        arrival_rate = args.arrival_rate,
        processing_mean = args.processing_mean,
        storage_mean = args.storage_mean,
        seed,
        replications = args.replications,
        "starting simulation"
    );

    if args.replications <= 1 {
        let report = Simulation::new(config, PcgStream::seeded(seed))?.run()?;
        println!("{report}");
        return Ok(());
    }

    let reports = run_replications(config, seed, args.replications)?;
    for (index, report) in reports.iter().enumerate() {
        println!(
            "replication {} (seed {})",
            index + 1,
            seed.wrapping_add(index as u64)
        );
        println!("{report}\n");
    }
    if let Some(mean) = Report::mean_of(&reports) {
        println!("mean of {} replications", reports.len());
        println!("{mean}");
    }
    Ok(())
}
