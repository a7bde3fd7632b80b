//! Run expansion and execution for the benchmark CLI.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use bench_core::{IndexTiming, PrimaryKey, RunConfig};
use bench_mysql::{new_mysql_pool, MysqlStore};
use bench_pipeline::{rate_per_second, Coordinator};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::args::{MysqlOpts, RunArgs, SweepArgs};
use crate::report::{RunOutcome, SweepReport};

/// Default sweep matrix. Later dimensions vary fastest, so all load shapes
/// for one row count are measured before the count grows.
const DEFAULT_ROWS: &[u64] = &[
    100_000,
    10_000_000,
    20_000_000,
    30_000_000,
    40_000_000,
    50_000_000,
];
const DEFAULT_CONCURRENCY: &[usize] = &[1, 2, 4];
const DEFAULT_BATCHES_PER_COMMIT: &[usize] = &[25, 50];
const DEFAULT_ROWS_PER_BATCH: &[usize] = &[5_000, 30_000];
const DEFAULT_INDEX_TIMINGS: &[IndexTiming] = &[IndexTiming::Late, IndexTiming::Early];
const DEFAULT_PRIMARY_KEYS: &[PrimaryKey] = &[
    PrimaryKey::AutoIncrement,
    PrimaryKey::Supplied,
    PrimaryKey::None,
];

/// Expand sweep arguments into the ordered list of run configurations.
///
/// Omitted dimensions fall back to the defaults above. Dimensions nest in
/// the order rows, concurrency, batches per commit, rows per batch, index
/// timing, primary key.
pub fn expand(args: &SweepArgs) -> Vec<RunConfig> {
    fn or_default<T: Copy>(values: &[T], default: &[T]) -> Vec<T> {
        if values.is_empty() {
            default.to_vec()
        } else {
            values.to_vec()
        }
    }

    let row_counts = or_default(&args.rows, DEFAULT_ROWS);
    let worker_counts = or_default(&args.concurrency, DEFAULT_CONCURRENCY);
    let commit_counts = or_default(&args.batches_per_commit, DEFAULT_BATCHES_PER_COMMIT);
    let batch_rows = or_default(&args.rows_per_batch, DEFAULT_ROWS_PER_BATCH);

    let index_timings: Vec<IndexTiming> = if args.index.is_empty() {
        DEFAULT_INDEX_TIMINGS.to_vec()
    } else {
        args.index.iter().copied().map(Into::into).collect()
    };
    let primary_keys: Vec<PrimaryKey> = if args.primary_key.is_empty() {
        DEFAULT_PRIMARY_KEYS.to_vec()
    } else {
        args.primary_key.iter().copied().map(Into::into).collect()
    };

    let mut configs = Vec::new();
    for &input_size in &row_counts {
        for &concurrency in &worker_counts {
            for &batches_per_commit in &commit_counts {
                for &rows_per_batch in &batch_rows {
                    for &index_timing in &index_timings {
                        for &primary_key in &primary_keys {
                            configs.push(RunConfig {
                                input_size,
                                concurrency,
                                batches_per_commit,
                                rows_per_batch,
                                index_timing,
                                primary_key,
                                error_policy: args.error_policy.into(),
                                seed: args.seed,
                            });
                        }
                    }
                }
            }
        }
    }
    configs
}

/// Execute one run against a fresh pool, releasing the pool afterwards
/// whatever the outcome.
async fn execute_run(
    mysql: &MysqlOpts,
    config: RunConfig,
    cancel: CancellationToken,
) -> Result<u64> {
    let pool = new_mysql_pool(&mysql.mysql_url).context("Failed to create MySQL pool")?;
    let store = Arc::new(
        MysqlStore::new(pool.clone(), config.primary_key).with_table(mysql.table.clone()),
    );

    let coordinator =
        Coordinator::new(config, Arc::clone(&store), store).with_cancellation(cancel);
    let result = coordinator.run().await;

    if let Err(e) = pool.disconnect().await {
        warn!("Failed to disconnect MySQL pool: {e}");
    }

    result
}

/// Execute the run subcommand: one benchmark run.
pub async fn run_single(args: RunArgs, cancel: CancellationToken) -> Result<()> {
    let config = args.to_config();
    config.validate()?;

    let started = Instant::now();
    let inserted = execute_run(&args.mysql, config, cancel).await?;
    let elapsed = started.elapsed();

    info!(
        "Inserted {inserted} rows in {elapsed:?} ({:.2} rows/sec)",
        rate_per_second(inserted, elapsed)
    );
    Ok(())
}

/// Execute the sweep subcommand: the full run matrix, one run at a time.
///
/// A failed run is recorded in the report and the sweep moves on; only
/// cancellation stops the remaining runs.
pub async fn run_sweep(args: SweepArgs, cancel: CancellationToken) -> Result<()> {
    let configs = expand(&args);
    info!("sweeping {} runs", configs.len());

    let mut report = SweepReport::new(args.seed);
    for (position, config) in configs.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!("sweep cancelled after {position} of {} runs", configs.len());
            break;
        }

        info!("run {}/{}: {}", position + 1, configs.len(), config.describe());
        let started = Instant::now();
        // A child token isolates per-run aborts from the sweep while still
        // following the process-wide cancellation.
        match execute_run(&args.mysql, config.clone(), cancel.child_token()).await {
            Ok(inserted) => {
                report.push(RunOutcome::completed(config, inserted, started.elapsed()));
            }
            Err(e) => {
                error!("run failed: {e:#}");
                report.push(RunOutcome::failed(config, started.elapsed(), &e));
            }
        }
    }

    println!("{}", report.summary());

    if let Some(path) = &args.json_out {
        report.write_json(path)?;
        info!("Wrote JSON report to {}", path.display());
    }

    if cancel.is_cancelled() {
        anyhow::bail!("sweep cancelled");
    }
    Ok(())
}
