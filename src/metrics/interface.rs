//! Per-interface traffic metric: bytes/packets/flows and unique source and
//! destination address counts, split by ingress vs egress interface index.
//!
//! Grounded on `original_source/netflow/metrics/metricInterface.go`.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use bson::doc;
use chrono::Utc;
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::StorageError;
use crate::ingest::DecodedMessage;
use crate::storage::bucket::truncate_to_bucket;

use super::MetricProcessor;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceMetric {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<bson::oid::ObjectId>,
    pub router_ip: String,
    pub interface_id: u32,
    pub interface_type: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub total_bytes: u64,
    pub total_packets: u64,
    pub total_flows: u64,
    pub unique_source_ips: u32,
    pub unique_dest_ips: u32,
}

#[derive(Eq, PartialEq, Hash, Clone)]
struct InterfaceKey {
    id: u32,
    interface_type: &'static str,
}

#[derive(Default)]
struct InterfaceStats {
    bytes: u64,
    packets: u64,
    flows: u64,
    source_ips: HashSet<String>,
    dest_ips: HashSet<String>,
}

pub struct InterfaceMetricProcessor {
    collection: Collection<InterfaceMetric>,
}

impl InterfaceMetricProcessor {
    pub fn new(db: &mongodb::Database) -> Self {
        InterfaceMetricProcessor {
            collection: db.collection("interface_metrics"),
        }
    }
}

#[async_trait]
impl MetricProcessor for InterfaceMetricProcessor {
    fn name(&self) -> &'static str {
        "interface_metric_analyzer"
    }

    async fn process(&self, device: Option<&Device>, decoded: &DecodedMessage) -> Result<(), StorageError> {
        if decoded.flow_records.is_empty() {
            return Ok(());
        }

        let mut data: HashMap<InterfaceKey, InterfaceStats> = HashMap::new();
        for record in &decoded.flow_records {
            let src = record.source_ipv4.map(|i| i.to_string()).or_else(|| record.source_ipv6.map(|i| i.to_string()));
            let dst = record.destination_ipv4.map(|i| i.to_string()).or_else(|| record.destination_ipv6.map(|i| i.to_string()));
            let bytes = record.octet_delta_count.unwrap_or(0);
            let packets = record.packet_delta_count.unwrap_or(0);

            for (id, kind) in [
                (record.ingress_interface, "ingress"),
                (record.egress_interface, "egress"),
            ] {
                let Some(id) = id.filter(|&id| id > 0) else { continue };
                let key = InterfaceKey { id, interface_type: kind };
                let stats = data.entry(key).or_default();
                stats.bytes += bytes;
                stats.packets += packets;
                stats.flows += 1;
                if let Some(ref ip) = src {
                    stats.source_ips.insert(ip.clone());
                }
                if let Some(ref ip) = dst {
                    stats.dest_ips.insert(ip.clone());
                }
            }
        }

        if data.is_empty() {
            return Ok(());
        }

        let bucket = truncate_to_bucket(Utc::now());
        let router_id = device.and_then(|d| d.id);

        for (key, stats) in data {
            let filter = doc! {
                "routerIp": &decoded.src_ip,
                "interfaceId": key.id,
                "interfaceType": key.interface_type,
                "timestamp": bucket,
            };
            let mut set_on_insert = doc! {
                "routerIp": &decoded.src_ip,
                "interfaceId": key.id,
                "interfaceType": key.interface_type,
                "timestamp": bucket,
                "createdAt": Utc::now(),
            };
            if let Some(id) = router_id {
                set_on_insert.insert("routerId", id);
            }
            let update = doc! {
                "$inc": {
                    "totalBytes": stats.bytes as i64,
                    "totalPackets": stats.packets as i64,
                    "totalFlows": stats.flows as i64,
                },
                "$set": {
                    "updatedAt": Utc::now(),
                    "uniqueSourceIps": stats.source_ips.len() as i32,
                    "uniqueDestIps": stats.dest_ips.len() as i32,
                },
                "$setOnInsert": set_on_insert,
            };
            self.collection
                .update_one(filter, update)
                .upsert(true)
                .await
                .map_err(StorageError::Operation)?;
        }

        Ok(())
    }
}
