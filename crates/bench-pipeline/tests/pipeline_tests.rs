//! End-to-end pipeline tests against an in-memory store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use bench_core::{
    Alien, CommitUnit, ErrorPolicy, IndexTiming, PrimaryKey, RunConfig,
};
use bench_generator::AlienGenerator;
use bench_pipeline::{Coordinator, PipelineError, SchemaManager, UnitWriter};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

const SEED: u64 = 100;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn config(
    input_size: u64,
    concurrency: usize,
    rows_per_batch: usize,
    batches_per_commit: usize,
) -> RunConfig {
    RunConfig {
        input_size,
        concurrency,
        batches_per_commit,
        rows_per_batch,
        index_timing: IndexTiming::Late,
        primary_key: PrimaryKey::AutoIncrement,
        error_policy: ErrorPolicy::Continue,
        seed: SEED,
    }
}

/// In-memory stand-in for the database: records schema events, stores rows,
/// and can inject a failure at one batch of one arriving unit. A failing
/// unit keeps none of its rows, mirroring a rolled-back transaction.
struct MemoryStore {
    events: Mutex<Vec<String>>,
    rows: Mutex<Vec<Alien>>,
    units_seen: AtomicU64,
    fail_at: Option<(u64, usize)>,
    schema_fail: bool,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            rows: Mutex::new(Vec::new()),
            units_seen: AtomicU64::new(0),
            fail_at: None,
            schema_fail: false,
        }
    }

    /// Fail the `batch_index`-th batch of the `unit_ordinal`-th arriving unit.
    fn failing_at(unit_ordinal: u64, batch_index: usize) -> Self {
        Self {
            fail_at: Some((unit_ordinal, batch_index)),
            ..Self::new()
        }
    }

    fn with_schema_failure() -> Self {
        Self {
            schema_fail: true,
            ..Self::new()
        }
    }

    async fn events(&self) -> Vec<String> {
        self.events.lock().await.clone()
    }

    async fn rows(&self) -> Vec<Alien> {
        self.rows.lock().await.clone()
    }

    fn units_seen(&self) -> u64 {
        self.units_seen.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SchemaManager for MemoryStore {
    async fn reset_table(&self) -> Result<u64> {
        if self.schema_fail {
            anyhow::bail!("injected schema failure");
        }
        self.rows.lock().await.clear();
        self.events.lock().await.push("reset".to_string());
        Ok(0)
    }

    async fn add_index(&self, columns: &[&str]) -> Result<u64> {
        self.events
            .lock()
            .await
            .push(format!("index:{}", columns.join(",")));
        Ok(0)
    }

    async fn add_primary_key(&self, strategy: PrimaryKey) -> Result<u64> {
        self.events.lock().await.push(format!("pk:{strategy}"));
        Ok(0)
    }
}

#[async_trait::async_trait]
impl UnitWriter for MemoryStore {
    async fn write_unit(&self, unit: &CommitUnit) -> Result<u64> {
        let ordinal = self.units_seen.fetch_add(1, Ordering::SeqCst);

        let mut staged = Vec::new();
        for (batch_index, batch) in unit.iter().enumerate() {
            if self.fail_at == Some((ordinal, batch_index)) {
                anyhow::bail!("injected failure in unit {ordinal} batch {batch_index}");
            }
            staged.extend(batch.iter().cloned());
        }

        let shape: Vec<String> = unit.iter().map(|batch| batch.len().to_string()).collect();
        self.events.lock().await.push(format!("unit:{}", shape.join("+")));

        let inserted = staged.len() as u64;
        self.rows.lock().await.extend(staged);
        Ok(inserted)
    }
}

fn coordinator(
    config: RunConfig,
    store: &Arc<MemoryStore>,
) -> Coordinator<MemoryStore, MemoryStore> {
    Coordinator::new(config, Arc::clone(store), Arc::clone(store))
}

fn sorted_ids(rows: &[Alien]) -> Vec<u64> {
    let mut ids: Vec<u64> = rows.iter().map(|alien| alien.id).collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn test_run_inserts_every_generated_row() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());

    let inserted = coordinator(config(37, 1, 10, 2), &store).run().await.unwrap();
    assert_eq!(inserted, 37);

    // One worker consumes units in dispatch order, so the table holds the
    // generator output verbatim.
    let expected: Vec<Alien> = AlienGenerator::new(SEED).aliens(37).collect();
    assert_eq!(store.rows().await, expected);

    let events = store.events().await;
    assert!(events.contains(&"unit:10+10".to_string()));
    assert!(events.contains(&"unit:10+7".to_string()));
}

#[tokio::test]
async fn test_two_workers_complete_a_short_run() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());

    let inserted = coordinator(config(37, 2, 10, 2), &store).run().await.unwrap();
    assert_eq!(inserted, 37);

    // Arrival order varies across workers; identity does not.
    assert_eq!(sorted_ids(&store.rows().await), (0..37).collect::<Vec<u64>>());

    let events = store.events().await;
    assert!(events.contains(&"unit:10+10".to_string()));
    assert!(events.contains(&"unit:10+7".to_string()));
}

#[tokio::test]
async fn test_worker_count_does_not_change_totals() {
    init_tracing();
    for concurrency in [1, 2, 4, 8] {
        let store = Arc::new(MemoryStore::new());

        let inserted = coordinator(config(1_000, concurrency, 10, 4), &store)
            .run()
            .await
            .unwrap();
        assert_eq!(inserted, 1_000, "lost rows with {concurrency} workers");

        let ids = sorted_ids(&store.rows().await);
        assert_eq!(ids, (0..1_000).collect::<Vec<u64>>());
    }
}

#[tokio::test]
async fn test_units_arrive_once_each() {
    let store = Arc::new(MemoryStore::new());
    let cfg = config(1_000, 4, 30, 7);
    let expected_units = cfg.commit_unit_count();

    coordinator(cfg, &store).run().await.unwrap();
    assert_eq!(store.units_seen(), expected_units);
}

#[tokio::test]
async fn test_failed_unit_rolls_back_only_its_rows() {
    init_tracing();
    // Third arriving unit (entities 40..60) fails at its second batch.
    let store = Arc::new(MemoryStore::failing_at(2, 1));

    let inserted = coordinator(config(100, 1, 10, 2), &store).run().await.unwrap();
    assert_eq!(inserted, 80);

    let ids: HashSet<u64> = store.rows().await.iter().map(|alien| alien.id).collect();
    assert_eq!(ids.len(), 80);
    for id in (0..40).chain(60..100) {
        assert!(ids.contains(&id), "missing surviving id {id}");
    }
    for id in 40..60 {
        assert!(!ids.contains(&id), "rolled-back id {id} persisted");
    }
}

#[tokio::test]
async fn test_abort_policy_stops_the_run() {
    init_tracing();
    let store = Arc::new(MemoryStore::failing_at(2, 1));

    let mut cfg = config(100, 1, 10, 2);
    cfg.error_policy = ErrorPolicy::Abort;

    let err = coordinator(cfg, &store).run().await.unwrap_err();
    assert!(format!("{err:#}").contains("aborted the run"));

    // Units 0 and 1 committed before the failing unit was attempted.
    assert_eq!(store.rows().await.len(), 40);
}

#[tokio::test]
async fn test_early_index_precedes_load() {
    let store = Arc::new(MemoryStore::new());

    let mut cfg = config(5, 1, 5, 1);
    cfg.index_timing = IndexTiming::Early;

    coordinator(cfg, &store).run().await.unwrap();
    assert_eq!(
        store.events().await,
        vec![
            "reset",
            "index:system,planet,species",
            "pk:auto-increment",
            "unit:5",
        ]
    );
}

#[tokio::test]
async fn test_late_index_follows_load() {
    let store = Arc::new(MemoryStore::new());

    coordinator(config(5, 1, 5, 1), &store).run().await.unwrap();
    assert_eq!(
        store.events().await,
        vec![
            "reset",
            "pk:auto-increment",
            "unit:5",
            "index:system,planet,species",
        ]
    );
}

#[tokio::test]
async fn test_primary_key_strategy_reaches_schema() {
    for (strategy, event) in [
        (PrimaryKey::Supplied, "pk:supplied"),
        (PrimaryKey::None, "pk:none"),
    ] {
        let store = Arc::new(MemoryStore::new());

        let mut cfg = config(5, 1, 5, 1);
        cfg.primary_key = strategy;

        coordinator(cfg, &store).run().await.unwrap();
        assert!(
            store.events().await.contains(&event.to_string()),
            "missing {event}"
        );
    }
}

#[tokio::test]
async fn test_cancelled_token_stops_before_any_insert() {
    let store = Arc::new(MemoryStore::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = coordinator(config(1_000, 2, 10, 2), &store)
        .with_cancellation(cancel)
        .run()
        .await
        .unwrap_err();

    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Cancelled { rows_inserted }) => assert_eq!(*rows_inserted, 0),
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert!(store.rows().await.is_empty());
}

#[tokio::test]
async fn test_zero_input_completes_with_zero_rows() {
    let store = Arc::new(MemoryStore::new());

    let inserted = coordinator(config(0, 2, 10, 2), &store).run().await.unwrap();
    assert_eq!(inserted, 0);

    let events = store.events().await;
    assert!(events.contains(&"reset".to_string()));
    assert!(!events.iter().any(|event| event.starts_with("unit:")));
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_schema_work() {
    let store = Arc::new(MemoryStore::new());

    let err = coordinator(config(100, 0, 10, 2), &store).run().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Config(_))
    ));
    assert!(store.events().await.is_empty());
}

#[tokio::test]
async fn test_schema_failure_honors_error_policy() {
    init_tracing();

    // Continue: the failed step is logged and the load still runs.
    let store = Arc::new(MemoryStore::with_schema_failure());
    let inserted = coordinator(config(20, 1, 10, 2), &store).run().await.unwrap();
    assert_eq!(inserted, 20);

    // Abort: the failed step ends the run before any insert.
    let store = Arc::new(MemoryStore::with_schema_failure());
    let mut cfg = config(20, 1, 10, 2);
    cfg.error_policy = ErrorPolicy::Abort;

    let err = coordinator(cfg, &store).run().await.unwrap_err();
    assert!(format!("{err:#}").contains("setup step failed"));
    assert!(store.rows().await.is_empty());
}
