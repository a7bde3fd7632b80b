//! Bounded dispatch queue between the batcher and the writer pool.

use std::sync::Arc;

use bench_core::CommitUnit;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Message carried by the dispatch queue.
///
/// Work and shutdown are distinct variants, so an empty commit unit can
/// never be mistaken for a termination signal.
#[derive(Debug)]
pub enum UnitMessage {
    /// One commit unit to write in one transaction.
    Work(CommitUnit),
    /// Stop pulling and exit. Sent exactly once per worker, after all work.
    Shutdown,
}

/// Create the bounded dispatch queue for one run.
///
/// `capacity` bounds how many messages may sit in the queue ahead of
/// consumption: a full queue suspends the producer, an empty queue suspends
/// workers. The token aborts both sides' waits when the run is cancelled.
pub fn unit_channel(capacity: usize, cancel: CancellationToken) -> (UnitSender, UnitReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        UnitSender { tx, cancel },
        UnitReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer side of the dispatch queue.
pub struct UnitSender {
    tx: mpsc::Sender<UnitMessage>,
    cancel: CancellationToken,
}

impl UnitSender {
    /// Enqueue one commit unit, waiting for capacity.
    ///
    /// Returns `false` when the run was cancelled or every worker is gone;
    /// the producer should stop dispatching then.
    pub async fn dispatch(&self, unit: CommitUnit) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            sent = self.tx.send(UnitMessage::Work(unit)) => sent.is_ok(),
        }
    }

    /// Send one shutdown message per worker.
    ///
    /// Called after the last unit was dispatched, so every shutdown message
    /// is queued strictly behind all work.
    pub async fn finish(&self, workers: usize) {
        for _ in 0..workers {
            let sent = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => false,
                sent = self.tx.send(UnitMessage::Shutdown) => sent.is_ok(),
            };
            if !sent {
                break;
            }
        }
    }
}

/// Consumer side of the dispatch queue, shared by every worker.
#[derive(Clone)]
pub struct UnitReceiver {
    rx: Arc<Mutex<mpsc::Receiver<UnitMessage>>>,
}

impl UnitReceiver {
    /// Dequeue the next message; `None` once the producer is gone and the
    /// queue has drained.
    pub async fn recv(&self) -> Option<UnitMessage> {
        self.rx.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::Alien;

    fn unit_of(rows: usize) -> CommitUnit {
        let batch: Vec<Alien> = (0..rows as u64)
            .map(|id| Alien {
                id,
                system: "system0".into(),
                planet: "planet0".into(),
                species: "species0".into(),
                age: 1,
                weight: 1,
                height: 1,
            })
            .collect();
        vec![batch]
    }

    #[tokio::test]
    async fn test_work_drains_before_shutdown() {
        let (sender, receiver) = unit_channel(8, CancellationToken::new());

        for rows in [1, 2, 3] {
            assert!(sender.dispatch(unit_of(rows)).await);
        }
        sender.finish(2).await;
        drop(sender);

        let mut work_sizes = Vec::new();
        let mut shutdowns = 0;
        while let Some(message) = receiver.recv().await {
            match message {
                UnitMessage::Work(unit) => {
                    assert_eq!(shutdowns, 0, "work arrived after a shutdown message");
                    work_sizes.push(unit[0].len());
                }
                UnitMessage::Shutdown => shutdowns += 1,
            }
        }

        assert_eq!(work_sizes, vec![1, 2, 3]);
        assert_eq!(shutdowns, 2);
    }

    #[tokio::test]
    async fn test_each_worker_consumes_one_shutdown() {
        let workers = 3;
        let (sender, receiver) = unit_channel(2, CancellationToken::new());

        let mut handles = Vec::new();
        for _ in 0..workers {
            let receiver = receiver.clone();
            handles.push(tokio::spawn(async move {
                let mut work_seen = 0u64;
                while let Some(message) = receiver.recv().await {
                    match message {
                        UnitMessage::Work(_) => work_seen += 1,
                        UnitMessage::Shutdown => break,
                    }
                }
                work_seen
            }));
        }
        drop(receiver);

        for _ in 0..7 {
            assert!(sender.dispatch(unit_of(1)).await);
        }
        sender.finish(workers).await;
        drop(sender);

        let mut total = 0u64;
        for handle in handles {
            total += handle.await.unwrap();
        }
        assert_eq!(total, 7);
    }

    #[tokio::test]
    async fn test_dispatch_stops_on_cancellation() {
        let cancel = CancellationToken::new();
        let (sender, _receiver) = unit_channel(2, cancel.clone());

        cancel.cancel();
        assert!(!sender.dispatch(unit_of(1)).await);
        // Must return rather than wait on a queue nobody drains.
        sender.finish(4).await;
    }

    #[tokio::test]
    async fn test_dispatch_stops_when_workers_are_gone() {
        let (sender, receiver) = unit_channel(2, CancellationToken::new());
        drop(receiver);

        assert!(!sender.dispatch(unit_of(1)).await);
    }
}
