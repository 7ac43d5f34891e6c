//! Concurrent batch writer
//!
//! Records are split into batches of `min(max(1, n / 10), 100)` and
//! written by at most [`WORKER_POOL_SIZE`] concurrent workers. Each worker
//! checks out its own store connection, so no connection is ever shared
//! between tasks.

use std::sync::Arc;

use shared::SyncReport;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::db::{SyncRecord, SyncStore};
use crate::error::SyncError;

/// Concurrent workers per run
pub const WORKER_POOL_SIZE: usize = 5;

const MAX_BATCH_SIZE: usize = 100;

/// Batch size for `total` records
pub fn batch_size(total: usize) -> usize {
    (total / 10).clamp(1, MAX_BATCH_SIZE)
}

/// Split records into consecutive batches, preserving order
pub fn partition<R>(records: Vec<R>, size: usize) -> Vec<Vec<R>> {
    let size = size.max(1);
    let mut batches = Vec::with_capacity(records.len().div_ceil(size));
    let mut iter = records.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(size).collect());
    }
    batches
}

/// Write all records and merge the per-batch counts
///
/// Never fails as a whole: record failures, connection failures and
/// crashed workers are logged and reflected in the returned counts.
pub async fn run_batches<R: SyncRecord>(
    store: Arc<dyn SyncStore>,
    records: Vec<R>,
) -> SyncReport {
    if records.is_empty() {
        return SyncReport::default();
    }

    let size = batch_size(records.len());
    let batches = partition(records, size);
    tracing::info!(
        batches = batches.len(),
        batch_size = size,
        "Starting batch upsert"
    );

    let semaphore = Arc::new(Semaphore::new(WORKER_POOL_SIZE));
    let mut join_set = JoinSet::new();

    for (index, batch) in batches.into_iter().enumerate() {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let store = store.clone();
        join_set.spawn(async move {
            let _permit = permit;
            write_batch(&*store, index + 1, batch).await
        });
    }

    let mut total = SyncReport::default();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(report) => total += report,
            Err(e) => {
                let err = SyncError::Batch(e.to_string());
                tracing::error!(error = %err, "Batch worker crashed");
            }
        }
    }
    total
}

async fn write_batch<R: SyncRecord>(
    store: &dyn SyncStore,
    batch: usize,
    records: Vec<R>,
) -> SyncReport {
    let mut report = SyncReport::default();

    let mut conn = match store.acquire().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(
                batch,
                records = records.len(),
                error = %e,
                "Failed to acquire connection"
            );
            report.errors = records.len() as u64;
            return report;
        }
    };

    for record in &records {
        match record.upsert(&mut *conn).await {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                report.errors += 1;
                tracing::error!(
                    batch,
                    record = %record.describe(),
                    error = %e,
                    "Error upserting record"
                );
            }
        }
    }

    tracing::debug!(
        batch,
        inserted = report.inserted,
        updated = report.updated,
        errors = report.errors,
        "Batch completed"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::test_support::employee;
    use shared::Employee;
    use std::time::Duration;

    fn employees(n: i64) -> Vec<Employee> {
        (1..=n).map(|i| employee(i, &format!("{i:011}"))).collect()
    }

    #[test]
    fn batch_size_bounds() {
        assert_eq!(batch_size(0), 1);
        assert_eq!(batch_size(9), 1);
        assert_eq!(batch_size(947), 94);
        assert_eq!(batch_size(1000), 100);
        assert_eq!(batch_size(50_000), 100);
    }

    #[test]
    fn partition_keeps_order_and_remainder() {
        let batches = partition((1..=947).collect::<Vec<_>>(), 94);
        assert_eq!(batches.len(), 11);
        assert_eq!(batches[10], (941..=947).collect::<Vec<_>>());
        assert!(batches[..10].iter().all(|b| b.len() == 94));
        assert!(partition(Vec::<i32>::new(), 10).is_empty());
    }

    #[tokio::test]
    async fn writes_every_record_once() {
        let store = MemoryStore::new();
        let report = run_batches(Arc::new(store.clone()), employees(947)).await;

        assert_eq!(report.counts(), (947, 0, 0));
        assert_eq!(store.employees().len(), 947);
        assert_eq!(store.acquired(), 11);
        assert_eq!(store.released(), 11);
    }

    #[tokio::test]
    async fn empty_input_touches_nothing() {
        let store = MemoryStore::new();
        let report = run_batches(Arc::new(store.clone()), Vec::<Employee>::new()).await;
        assert_eq!(report, SyncReport::default());
        assert_eq!(store.acquired(), 0);
    }

    #[tokio::test]
    async fn record_failure_stays_in_its_batch() {
        let store = MemoryStore::new();
        store.fail_on_cpf(&format!("{:011}", 5));
        let report = run_batches(Arc::new(store.clone()), employees(30)).await;

        assert_eq!(report.counts(), (29, 0, 1));
        assert_eq!(store.acquired(), store.released());
    }

    #[tokio::test]
    async fn crashed_worker_contributes_nothing() {
        let store = MemoryStore::new();
        store.panic_on_cpf(&format!("{:011}", 5));
        let report = run_batches(Arc::new(store.clone()), employees(30)).await;

        // 10 batches of 3, the second one dies after writing one record
        assert_eq!(report.counts(), (27, 0, 0));
        assert_eq!(store.employees().len(), 28);
        assert_eq!(store.acquired(), 10);
        assert_eq!(store.released(), 10);
    }

    #[tokio::test]
    async fn failed_acquire_counts_whole_batch() {
        let store = MemoryStore::new();
        store.fail_next_acquires(1);
        let report = run_batches(Arc::new(store.clone()), employees(30)).await;

        assert_eq!(report.counts(), (27, 0, 3));
        assert_eq!(store.acquired(), 9);
        assert_eq!(store.released(), 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn at_most_five_batches_hold_a_connection() {
        let store = MemoryStore::new();
        store.delay_upserts(Duration::from_millis(2));
        let records = employees(300);
        assert_eq!(partition(records.clone(), batch_size(300)).len(), 10);

        let report = run_batches(Arc::new(store.clone()), records).await;

        assert_eq!(report.counts(), (300, 0, 0));
        assert!(store.peak_live() <= WORKER_POOL_SIZE as u64);
        assert!(store.peak_live() > 1);
        assert_eq!(store.acquired(), 10);
        assert_eq!(store.released(), 10);
    }

    #[tokio::test]
    async fn second_run_updates() {
        let store = MemoryStore::new();
        run_batches(Arc::new(store.clone()), employees(20)).await;
        let report = run_batches(Arc::new(store.clone()), employees(20)).await;

        assert_eq!(report.counts(), (0, 20, 0));
        assert_eq!(store.employees().len(), 20);
    }
}
