//! Decoder worker pool: consumes the raw queue, decodes IPFIX datagrams, and
//! republishes flow records on the decoded queue.
//!
//! Grounded on `original_source/netflow/decoderWorker.go`'s
//! `StartDecoderWorkers`, with one deliberate deviation: each worker here
//! owns its own `TemplateCache` rather than sharing one process-wide cache,
//! per the no-cross-worker-sharing requirement - a device's export can land
//! on any worker, so a worker that hasn't seen that device's templates yet
//! will skip its data FlowSets (`UnknownTemplate`) until it does.

use std::sync::Arc;

use futures::StreamExt;
use log::{error, warn};

use crate::bus::{ack, nack, Queue};
use crate::ingest::message::{DecodedMessage, PacketMessage};
use crate::ipfix::{self, TemplateCache};

pub async fn run_worker(worker_id: usize, raw_queue: Arc<Queue>, decoded_queue: Arc<Queue>) {
    let mut cache = TemplateCache::new();
    let consumer_tag = format!("ipfix-decoder-{worker_id}");
    let mut consumer = match raw_queue.consume(&consumer_tag).await {
        Ok(c) => c,
        Err(err) => {
            error!("decoder worker {worker_id} failed to start consuming: {err}");
            return;
        }
    };

    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(d) => d,
            Err(err) => {
                warn!("decoder worker {worker_id} delivery error: {err}");
                continue;
            }
        };

        let packet: PacketMessage = match serde_json::from_slice(&delivery.data) {
            Ok(p) => p,
            Err(err) => {
                warn!("decoder worker {worker_id} dropping malformed raw message: {err}");
                let _ = nack(&delivery, false).await;
                continue;
            }
        };

        let decoded = match ipfix::decode(&packet.raw, &mut cache) {
            Ok(d) => d,
            Err(err) => {
                warn!("decoder worker {worker_id} dropping undecodable datagram from {}: {err}", packet.src_ip);
                let _ = ack(&delivery).await;
                continue;
            }
        };

        let out = DecodedMessage {
            src_ip: packet.src_ip,
            src_port: packet.src_port,
            received: packet.received,
            observation_domain_id: decoded.header.observation_domain_id,
            sequence_number: decoded.header.sequence_number,
            flow_records: decoded.records,
        };

        match decoded_queue.publish_json(&out).await {
            Ok(()) => {
                let _ = ack(&delivery).await;
            }
            Err(err) => {
                error!("decoder worker {worker_id} failed to publish decoded message, requeuing: {err}");
                let _ = nack(&delivery, true).await;
            }
        }
    }
}

pub async fn spawn_pool(worker_count: usize, raw_queue: Arc<Queue>, decoded_queue: Arc<Queue>) -> Vec<tokio::task::JoinHandle<()>> {
    (0..worker_count)
        .map(|id| {
            let raw = raw_queue.clone();
            let decoded = decoded_queue.clone();
            tokio::spawn(run_worker(id, raw, decoded))
        })
        .collect()
}
