//! Command-line interface for insert-bench
//!
//! # Usage Examples
//!
//! ```bash
//! # One run with an explicit load shape
//! insert-bench run \
//!   --rows 1000000 \
//!   --concurrency 4 \
//!   --rows-per-batch 5000 \
//!   --batches-per-commit 25 \
//!   --index late \
//!   --primary-key auto-increment
//!
//! # Full sweep over the default matrix, with a JSON report
//! insert-bench sweep --json-out report.json
//!
//! # Narrow sweep over two dimensions
//! insert-bench sweep \
//!   --rows 100000,1000000 \
//!   --concurrency 1,2,4 \
//!   --index late
//! ```
//!
//! The MySQL connection defaults to the docker-compose service URL and can
//! be overridden with `--mysql-url` or the `MYSQL_URL` environment variable.

use clap::{Parser, Subcommand};
use insert_bench::args::{RunArgs, SweepArgs};
use insert_bench::sweep;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Parser)]
#[command(name = "insert-bench")]
#[command(about = "MySQL bulk-insert throughput benchmark")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a single benchmark run
    Run(RunArgs),

    /// Execute a matrix of runs and print a combined report
    Sweep(SweepArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current commit unit");
            ctrl_c.cancel();
        }
    });

    match cli.command {
        Commands::Run(args) => sweep::run_single(args, cancel).await,
        Commands::Sweep(args) => sweep::run_sweep(args, cancel).await,
    }
}
