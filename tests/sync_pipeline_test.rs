//! End-to-end pipeline tests: offline counting, reconnection, retries, and
//! restart recovery.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{pipeline, seed_counts, TestTransport};
use pretty_assertions::assert_eq;
use stocktake::error::SyncError;
use stocktake::offline::{
    CountOperation, ItemCache, ItemRecord, OperationQueue, OperationStatus,
};
use stocktake::sync::{Connectivity, NetworkMonitor, SyncConfig, SyncService};
use uuid::Uuid;

#[tokio::test]
async fn test_offline_counts_drain_in_order_after_reconnect() {
    let p = pipeline();
    p.monitor.set(Connectivity::Offline).await;

    let session = Uuid::new_v4();
    let ids = seed_counts(&p.queue, session, &["A", "B", "C"]).await;

    // Offline: nothing moves, nothing is lost.
    let err = p.service.force_sync(None).await.unwrap_err();
    assert!(matches!(err, SyncError::Offline));
    assert_eq!(p.queue.len().await, 3);
    assert_eq!(p.transport.submissions(), 0);

    // Back online: the backlog drains in arrival order.
    p.monitor.set(Connectivity::Online).await;
    let result = p.service.force_sync(None).await.unwrap();

    assert_eq!(result.success_count, 3);
    assert_eq!(result.total, 3);
    assert!(p.queue.is_empty().await);
    assert_eq!(p.transport.submitted(), ids);
}

#[tokio::test]
async fn test_all_operation_kinds_drain() {
    let p = pipeline();
    let session = Uuid::new_v4();

    p.queue
        .enqueue(CountOperation::submit_count(session, "4006381333931", 4))
        .await;
    p.queue
        .enqueue(CountOperation::adjust_count(
            session,
            "4006381333931",
            3,
            Some("recount after shelf move".to_string()),
        ))
        .await;
    p.queue
        .enqueue(CountOperation::attach_serial(session, "8712345678906", "SN-0042"))
        .await;
    p.queue.enqueue(CountOperation::close_session(session)).await;

    let result = p.service.force_sync(None).await.unwrap();

    assert_eq!(result.success_count, 4);
    assert!(result.is_clean());
    assert!(p.queue.is_empty().await);
}

#[tokio::test]
async fn test_rejected_operation_retries_on_next_cycle() {
    let p = pipeline();
    p.transport.reject("B", "HTTP 422: duplicate tally");

    let session = Uuid::new_v4();
    let ids = seed_counts(&p.queue, session, &["A", "B"]).await;

    let result = p.service.force_sync(None).await.unwrap();
    assert_eq!(result.success_count, 1);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.errors[0].op_id, Some(ids[1]));

    // The rejection is bookkept on the queued operation.
    let remaining = p.queue.pending().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].status, OperationStatus::Failed);
    assert_eq!(remaining[0].attempts, 1);
    assert!(remaining[0]
        .last_error
        .as_deref()
        .unwrap()
        .contains("HTTP 422"));

    // The backend relents; the next cycle clears the backlog.
    p.transport.accept_all();
    let result = p.service.force_sync(None).await.unwrap();
    assert_eq!(result.success_count, 1);
    assert!(p.queue.is_empty().await);
}

#[tokio::test]
async fn test_unreachable_backend_leaves_rest_of_queue_untouched() {
    let p = pipeline();
    p.transport.unreachable_on("B");

    let session = Uuid::new_v4();
    let ids = seed_counts(&p.queue, session, &["A", "B", "C"]).await;

    let result = p.service.force_sync(None).await.unwrap();
    assert_eq!(result.success_count, 1);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.total, 3);

    // The cycle stopped at B; C was never attempted.
    assert_eq!(p.transport.submitted(), vec![ids[0], ids[1]]);
    assert_eq!(p.queue.len().await, 2);

    // Once the backend is reachable, one cycle finishes the job.
    p.transport.accept_all();
    let result = p.service.force_sync(None).await.unwrap();
    assert_eq!(result.success_count, 2);
    assert!(p.queue.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_auto_sync_retries_until_backend_reachable() {
    let p = pipeline();
    p.transport.set_unreachable(true);
    seed_counts(&p.queue, Uuid::new_v4(), &["A"]).await;

    let task = p.service.spawn_auto_sync();

    // Two ticks attempt and fail against the dead backend.
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(p.queue.len().await, 1);
    assert!(p.transport.submissions() >= 2);

    // The backend comes back; the next tick drains the backlog.
    p.transport.accept_all();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(p.queue.is_empty().await);

    task.abort();
}

#[tokio::test]
async fn test_queue_snapshot_survives_restart() {
    let first_run = pipeline();
    first_run.monitor.set(Connectivity::Offline).await;

    let session = Uuid::new_v4();
    let ids = seed_counts(&first_run.queue, session, &["A", "B"]).await;

    // The host persists the queue before shutdown...
    let saved = first_run.queue.export_json().await.unwrap();
    drop(first_run);

    // ...and restores it on the next launch with fresh wiring.
    let restored = Arc::new(OperationQueue::import_json(&saved).unwrap());
    let transport = TestTransport::accepting();
    let service = SyncService::new(
        SyncConfig::default(),
        Arc::clone(&restored),
        Arc::new(ItemCache::new()),
        NetworkMonitor::default(),
        Arc::clone(&transport) as Arc<dyn stocktake::sync::SyncTransport>,
    );

    let result = service.force_sync(None).await.unwrap();
    assert_eq!(result.success_count, 2);
    assert_eq!(transport.submitted(), ids);
    assert!(restored.is_empty().await);
}

#[tokio::test]
async fn test_status_reflects_cache_queue_and_last_sync() {
    let p = pipeline();
    p.cache
        .put(ItemRecord::new("4006381333931", "Stabilo point 88 fine"))
        .await;
    p.cache
        .put(ItemRecord::new("8712345678906", "Club-Mate 0.5l"))
        .await;
    seed_counts(&p.queue, Uuid::new_v4(), &["4006381333931"]).await;

    let status = p.service.load_status().await.unwrap();
    assert!(status.is_online);
    assert_eq!(status.cache_size, 2);
    assert_eq!(status.queued_operations, 1);
    assert!(status.needs_sync);
    assert!(status.last_sync_at.is_none());

    p.service.force_sync(None).await.unwrap();

    let status = p.service.load_status().await.unwrap();
    assert_eq!(status.queued_operations, 0);
    assert!(!status.needs_sync);
    assert!(status.last_sync_at.is_some());
    assert_eq!(status.cache_size, 2);
}
