//! Writer-pool worker loop.

use std::sync::Arc;

use anyhow::Context;
use bench_core::{unit_rows, ErrorPolicy};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::counter::LoadCounter;
use crate::queue::{UnitMessage, UnitReceiver};
use crate::store::UnitWriter;

/// One writer worker: pull commit units until shutdown, write each through
/// the store, and publish counts.
///
/// The cancellation token is checked before every dequeue, so a cancelled
/// run stops between commit units; a unit already handed to the store runs
/// to its own commit or rollback. Under [`ErrorPolicy::Abort`] the first
/// failed unit cancels the token, draining the rest of the pool.
pub(crate) async fn run_writer<S>(
    worker_id: usize,
    receiver: UnitReceiver,
    store: Arc<S>,
    counter: LoadCounter,
    error_policy: ErrorPolicy,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    S: UnitWriter + 'static,
{
    let mut written = 0u64;

    loop {
        let message = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            message = receiver.recv() => message,
        };

        let unit = match message {
            Some(UnitMessage::Work(unit)) => unit,
            Some(UnitMessage::Shutdown) | None => break,
        };

        let rows = unit_rows(&unit);
        match store.write_unit(&unit).await {
            Ok(inserted) => {
                counter.record_inserted(inserted);
                written += inserted;
                debug!("writer {worker_id}: committed unit of {inserted} rows");
            }
            Err(e) => {
                counter.record_unit_failure();
                match error_policy {
                    ErrorPolicy::Continue => {
                        warn!("writer {worker_id}: unit of {rows} rows rolled back: {e:#}");
                    }
                    ErrorPolicy::Abort => {
                        cancel.cancel();
                        return Err(e).with_context(|| {
                            format!("writer {worker_id} aborted the run on a failed unit of {rows} rows")
                        });
                    }
                }
            }
        }
    }

    debug!("writer {worker_id}: exiting after {written} rows");
    Ok(())
}
