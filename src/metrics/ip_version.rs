//! IPv4/IPv6 split metric: counts flows, bytes, and packets by address
//! family and keeps a running percentage split.
//!
//! Grounded on `original_source/netflow/metrics/ipVersionMetric.go`.

use async_trait::async_trait;
use bson::{doc, Document};
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
pub struct IpVersionMetric {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<bson::oid::ObjectId>,
    pub router_ip: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub ipv4_flow_count: u64,
    pub ipv4_bytes: u64,
    pub ipv4_packets: u64,
    pub ipv6_flow_count: u64,
    pub ipv6_bytes: u64,
    pub ipv6_packets: u64,
    pub ipv4_percentage: f64,
    pub ipv6_percentage: f64,
}

pub struct IpVersionMetricProcessor {
    collection: Collection<IpVersionMetric>,
}

impl IpVersionMetricProcessor {
    pub fn new(db: &mongodb::Database) -> Self {
        IpVersionMetricProcessor {
            collection: db.collection("ip_version_metrics"),
        }
    }
}

#[derive(Default)]
struct Aggregate {
    ipv4_flows: u64,
    ipv4_bytes: u64,
    ipv4_packets: u64,
    ipv6_flows: u64,
    ipv6_bytes: u64,
    ipv6_packets: u64,
}

#[async_trait]
impl MetricProcessor for IpVersionMetricProcessor {
    fn name(&self) -> &'static str {
        "ip_version_analyzer"
    }

    async fn process(&self, device: Option<&Device>, decoded: &DecodedMessage) -> Result<(), StorageError> {
        if decoded.flow_records.is_empty() {
            return Ok(());
        }

        let mut agg = Aggregate::default();
        for record in &decoded.flow_records {
            let is_v4 = record.source_ipv4.is_some() && record.destination_ipv4.is_some();
            let is_v6 = record.source_ipv6.is_some() && record.destination_ipv6.is_some();
            let bytes = record.octet_delta_count.unwrap_or(0);
            let packets = record.packet_delta_count.unwrap_or(0);
            if is_v4 {
                agg.ipv4_flows += 1;
                agg.ipv4_bytes += bytes;
                agg.ipv4_packets += packets;
            } else if is_v6 {
                agg.ipv6_flows += 1;
                agg.ipv6_bytes += bytes;
                agg.ipv6_packets += packets;
            }
        }

        if agg.ipv4_flows == 0 && agg.ipv6_flows == 0 {
            return Ok(());
        }

        let bucket = truncate_to_bucket(Utc::now());
        let router_id = device.and_then(|d| d.id);
        let filter = doc! { "routerIp": &decoded.src_ip, "timestamp": bucket };

        let mut set_on_insert = doc! {
            "routerIp": &decoded.src_ip,
            "timestamp": bucket,
            "createdAt": Utc::now(),
        };
        if let Some(id) = router_id {
            set_on_insert.insert("routerId", id);
        }

        let update: Document = doc! {
            "$inc": {
                "ipv4FlowCount": agg.ipv4_flows as i64,
                "ipv4Bytes": agg.ipv4_bytes as i64,
                "ipv4Packets": agg.ipv4_packets as i64,
                "ipv6FlowCount": agg.ipv6_flows as i64,
                "ipv6Bytes": agg.ipv6_bytes as i64,
                "ipv6Packets": agg.ipv6_packets as i64,
            },
            "$set": { "updatedAt": Utc::now() },
            "$setOnInsert": set_on_insert,
        };

        let result = self
            .collection
            .update_one(filter.clone(), update)
            .upsert(true)
            .await
            .map_err(StorageError::Operation)?;

        if result.modified_count > 0 || result.upserted_id.is_some() {
            if let Some(mut metric) = self
                .collection
                .find_one(filter.clone())
                .await
                .map_err(StorageError::Operation)?
            {
                let total = metric.ipv4_flow_count + metric.ipv6_flow_count;
                if total > 0 {
                    metric.ipv4_percentage = metric.ipv4_flow_count as f64 / total as f64 * 100.0;
                    metric.ipv6_percentage = metric.ipv6_flow_count as f64 / total as f64 * 100.0;
                    self.collection
                        .update_one(
                            filter,
                            doc! { "$set": {
                                "ipv4Percentage": metric.ipv4_percentage,
                                "ipv6Percentage": metric.ipv6_percentage,
                            } },
                        )
                        .await
                        .map_err(StorageError::Operation)?;
                }
            }
        }

        Ok(())
    }
}
