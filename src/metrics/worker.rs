//! Metric worker pool: consumes the decoded queue, resolves the source
//! device, and runs every registered metric processor over the message.
//!
//! Grounded on `original_source/netflow/worker.go`'s `StartMetricWorkers`:
//! device lookup by source IP (nil device if unknown - processors still run,
//! just without a router id to attach), requeue-on-any-processor-error.

use std::sync::Arc;

use futures::StreamExt;
use log::{error, warn};

use crate::bus::{ack, nack, Queue};
use crate::ingest::DecodedMessage;
use crate::metrics::MetricRegistry;
use crate::storage::DeviceRepository;

pub async fn run_worker(
    worker_id: usize,
    decoded_queue: Arc<Queue>,
    registry: Arc<MetricRegistry>,
    devices: Arc<DeviceRepository>,
) {
    let consumer_tag = format!("metric-worker-{worker_id}");
    let mut consumer = match decoded_queue.consume(&consumer_tag).await {
        Ok(c) => c,
        Err(err) => {
            error!("metric worker {worker_id} failed to start consuming: {err}");
            return;
        }
    };

    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(d) => d,
            Err(err) => {
                warn!("metric worker {worker_id} delivery error: {err}");
                continue;
            }
        };

        let decoded: DecodedMessage = match serde_json::from_slice(&delivery.data) {
            Ok(d) => d,
            Err(err) => {
                warn!("metric worker {worker_id} dropping malformed decoded message: {err}");
                let _ = ack(&delivery).await;
                continue;
            }
        };

        let device = match devices.find_by_ip(&decoded.src_ip).await {
            Ok(device) => device,
            Err(err) => {
                warn!("metric worker {worker_id} device lookup failed for {}: {err}", decoded.src_ip);
                None
            }
        };

        let mut has_error = false;
        for processor in registry.processors() {
            if let Err(err) = processor.process(device.as_ref(), &decoded).await {
                error!("metric processor '{}' failed: {err}", processor.name());
                has_error = true;
            }
        }

        if has_error {
            let _ = nack(&delivery, true).await;
        } else {
            let _ = ack(&delivery).await;
        }
    }
}

pub async fn spawn_pool(
    worker_count: usize,
    decoded_queue: Arc<Queue>,
    registry: Arc<MetricRegistry>,
    devices: Arc<DeviceRepository>,
) -> Vec<tokio::task::JoinHandle<()>> {
    (0..worker_count)
        .map(|id| {
            let queue = decoded_queue.clone();
            let registry = registry.clone();
            let devices = devices.clone();
            tokio::spawn(run_worker(id, queue, registry, devices))
        })
        .collect()
}
