#![deny(clippy::correctness)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::cast_lossless
)]
//! CLI for preparing ANN benchmark datasets: reducing raw vector files and
//! computing, verifying, and inspecting exact ground truth.

mod commands;
mod data;
mod utils;

use clap::Parser;

use commands::Commands;

/// Command-line arguments for the `shell` binary.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The random seed to use.
    #[arg(short('s'), long)]
    seed: Option<u64>,

    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let (_guard, log_path) = utils::configure_logger("truthset-shell")?;
    println!("Log file: {log_path:?}");

    ftlog::info!("{args:?}");

    match args.command {
        Commands::GroundTruth { paths, k, sample } => {
            commands::ground_truth::compute(&paths, k, sample, args.seed)
        }
        Commands::Verify { paths, sample } => commands::verify::check(&paths, sample, args.seed),
        Commands::Info { path } => commands::info::report(&path),
        Commands::Reduce {
            dataset,
            source,
            base_factor,
            query_factor,
            k,
        } => commands::reduce::reduce(&dataset, &source, base_factor, query_factor, k, args.seed),
    }
}
