//! Pipeline coordinator: owns one benchmark run end to end.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use bench_core::{ErrorPolicy, IndexTiming, RunConfig, INDEX_COLUMNS};
use bench_generator::AlienGenerator;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::batcher;
use crate::counter::LoadCounter;
use crate::error::PipelineError;
use crate::queue::unit_channel;
use crate::rate::measured;
use crate::store::{SchemaManager, UnitWriter};
use crate::worker;

/// Coordinator wiring the generator, batcher, queue, and writer pool for
/// one run.
///
/// The schema manager and the unit writer are its only collaborators; the
/// connection pool behind them is constructed and released by the caller,
/// so one pool can serve many consecutive runs.
pub struct Coordinator<M, S> {
    config: RunConfig,
    schema: Arc<M>,
    store: Arc<S>,
    cancel: CancellationToken,
}

impl<M, S> Coordinator<M, S>
where
    M: SchemaManager + 'static,
    S: UnitWriter + 'static,
{
    /// Create a coordinator for `config` with a token of its own.
    pub fn new(config: RunConfig, schema: Arc<M>, store: Arc<S>) -> Self {
        Self {
            config,
            schema,
            store,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the cancellation token with an externally owned one, e.g.
    /// the process-wide Ctrl-C token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Execute the run and return the total number of inserted rows.
    ///
    /// Steps in order: reset the table, add the index when timing is
    /// `early`, apply the primary-key strategy, load every commit unit
    /// through the writer pool, then add the index when timing is `late`.
    /// Every step is individually rate-logged.
    pub async fn run(&self) -> Result<u64> {
        self.config.validate().map_err(PipelineError::Config)?;
        let desc = self.config.describe();
        info!("starting run: {desc}");

        self.setup_step(&format!("{desc} reset table"), || self.schema.reset_table())
            .await?;

        if self.config.index_timing == IndexTiming::Early {
            self.setup_step(&format!("{desc} add index"), || {
                self.schema.add_index(INDEX_COLUMNS)
            })
            .await?;
        }

        self.setup_step(&format!("{desc} add primary key"), || {
            self.schema.add_primary_key(self.config.primary_key)
        })
        .await?;

        let inserted = measured(&format!("{desc} load"), || self.load()).await?;

        if self.config.index_timing == IndexTiming::Late {
            self.setup_step(&format!("{desc} add index"), || {
                self.schema.add_index(INDEX_COLUMNS)
            })
            .await?;
        }

        info!("run complete: {desc} inserted={inserted}");
        Ok(inserted)
    }

    /// Run one rate-logged schema step under the configured error policy.
    ///
    /// Under [`ErrorPolicy::Continue`] a failed step is logged and the run
    /// carries on against the unchanged schema; under
    /// [`ErrorPolicy::Abort`] the failure ends the run.
    async fn setup_step<F, Fut>(&self, label: &str, work: F) -> Result<u64>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u64>>,
    {
        match measured(label, work).await {
            Ok(affected) => Ok(affected),
            Err(e) => match self.config.error_policy {
                ErrorPolicy::Continue => {
                    error!("{label}: continuing with unchanged schema: {e:#}");
                    Ok(0)
                }
                ErrorPolicy::Abort => Err(e.context(format!("setup step failed: {label}"))),
            },
        }
    }

    /// Drive the load phase: spawn the writer pool, stream commit units
    /// into the queue, terminate the pool, and collect the counts.
    async fn load(&self) -> Result<u64> {
        let config = &self.config;
        let counter = LoadCounter::new();
        let (sender, receiver) = unit_channel(config.queue_capacity(), self.cancel.clone());

        let mut handles = Vec::with_capacity(config.concurrency);
        for worker_id in 0..config.concurrency {
            handles.push(tokio::spawn(worker::run_writer(
                worker_id,
                receiver.clone(),
                Arc::clone(&self.store),
                counter.clone(),
                config.error_policy,
                self.cancel.clone(),
            )));
        }
        // Workers hold the only receiver handles from here on.
        drop(receiver);

        let units = batcher::commit_units(
            AlienGenerator::new(config.seed).aliens(config.input_size),
            config.rows_per_batch,
            config.batches_per_commit,
        );
        let mut dispatched = 0u64;
        for unit in units {
            if !sender.dispatch(unit).await {
                warn!(
                    "dispatch stopped after {dispatched} of {} commit units",
                    config.commit_unit_count()
                );
                break;
            }
            dispatched += 1;
        }
        sender.finish(config.concurrency).await;
        drop(sender);
        debug!("dispatched {dispatched} commit units to {} writers", config.concurrency);

        let mut failures = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(format!("{e:#}")),
                Err(e) => failures.push(format!("writer panicked: {e}")),
            }
        }

        let inserted = counter.rows_inserted();
        if !failures.is_empty() {
            anyhow::bail!("load failed after {inserted} rows: {}", failures.join("; "));
        }
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled {
                rows_inserted: inserted,
            }
            .into());
        }
        if counter.units_failed() > 0 {
            warn!(
                "{} commit units rolled back; {inserted} rows kept",
                counter.units_failed()
            );
        }
        Ok(inserted)
    }
}
