//! Pipeline wiring helpers.

use std::sync::Arc;

use stocktake::offline::{CountOperation, ItemCache, OperationQueue, QueuedOperation};
use stocktake::sync::{NetworkMonitor, SyncConfig, SyncReporter, SyncService};
use uuid::Uuid;

use super::fakes::TestTransport;

/// A fully wired pipeline around a scriptable transport.
pub struct Pipeline {
    pub queue: Arc<OperationQueue>,
    pub cache: Arc<ItemCache>,
    pub monitor: NetworkMonitor,
    pub transport: Arc<TestTransport>,
    pub service: Arc<SyncService>,
}

/// Assemble a pipeline with an accepting transport and default timings.
pub fn pipeline() -> Pipeline {
    pipeline_with(TestTransport::accepting(), SyncConfig::default())
}

pub fn pipeline_with(transport: Arc<TestTransport>, config: SyncConfig) -> Pipeline {
    let queue = Arc::new(OperationQueue::new());
    let cache = Arc::new(ItemCache::new());
    let monitor = NetworkMonitor::default();
    let service = Arc::new(SyncService::new(
        config,
        Arc::clone(&queue),
        Arc::clone(&cache),
        monitor.clone(),
        Arc::clone(&transport) as Arc<dyn stocktake::sync::SyncTransport>,
    ));

    Pipeline {
        queue,
        cache,
        monitor,
        transport,
        service,
    }
}

/// Reporter driven by the pipeline's own service on both seams.
pub fn reporter_for(pipeline: &Pipeline, config: SyncConfig) -> SyncReporter {
    SyncReporter::new(pipeline.service.clone(), pipeline.service.clone(), config)
}

/// Enqueue one count submission per barcode. Returns the operation ids in
/// arrival order.
pub async fn seed_counts(queue: &OperationQueue, session: Uuid, barcodes: &[&str]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(barcodes.len());
    for (index, barcode) in barcodes.iter().enumerate() {
        let quantity = (index + 1) as u32;
        ids.push(
            queue
                .enqueue(CountOperation::submit_count(session, *barcode, quantity))
                .await,
        );
    }
    ids
}

/// A queued operation ready to hand to a transport.
pub async fn queued_item(barcode: &str, quantity: u32) -> QueuedOperation {
    let queue = OperationQueue::new();
    queue
        .enqueue(CountOperation::submit_count(Uuid::new_v4(), barcode, quantity))
        .await;
    queue.pending().await.remove(0)
}
