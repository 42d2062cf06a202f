//! DNS resolution quality metric: per-DNS-server query/response counts and
//! byte totals, bucketed the same way as `ip_version`.
//!
//! Grounded on `original_source/netflow/metrics/dnsQuality.go`. The original
//! collects a `DNSFlow` list intended for query/response latency correlation
//! but never wires it up (the call into `saveMetrics` is commented out in
//! the source); this port completes the wiring - persisting query/response
//! counts and byte totals - but leaves per-pair response-time correlation
//! out, since the original's own correlation step was never implemented and
//! there's nothing to port. See DESIGN.md.

use std::collections::HashMap;

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
pub struct DnsQualityMetric {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<bson::oid::ObjectId>,
    pub router_ip: String,
    pub dns_server_ip: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub total_queries: u64,
    pub total_responses: u64,
    pub query_bytes: u64,
    pub response_bytes: u64,
    pub total_bytes: u64,
    pub timeout_count: u64,
    pub success_rate: f64,
    pub timeout_percentage: f64,
}

#[derive(Default)]
struct DnsStats {
    query_count: u64,
    response_count: u64,
    query_bytes: u64,
    response_bytes: u64,
}

pub struct DnsQualityMetricProcessor {
    collection: Collection<DnsQualityMetric>,
}

impl DnsQualityMetricProcessor {
    pub fn new(db: &mongodb::Database) -> Self {
        DnsQualityMetricProcessor {
            collection: db.collection("dns_quality_metrics"),
        }
    }
}

#[async_trait]
impl MetricProcessor for DnsQualityMetricProcessor {
    fn name(&self) -> &'static str {
        "dns_quality_analyzer"
    }

    async fn process(&self, device: Option<&Device>, decoded: &DecodedMessage) -> Result<(), StorageError> {
        if decoded.flow_records.is_empty() {
            return Ok(());
        }

        let mut per_server: HashMap<String, DnsStats> = HashMap::new();
        for record in &decoded.flow_records {
            let is_query = record.destination_port == Some(53) && record.protocol_identifier == Some(17);
            let is_response = record.source_port == Some(53) && record.protocol_identifier == Some(17);
            if !is_query && !is_response {
                continue;
            }
            let server_ip = if is_query {
                record.destination_ipv4.map(|ip| ip.to_string()).or_else(|| record.destination_ipv6.map(|ip| ip.to_string()))
            } else {
                record.source_ipv4.map(|ip| ip.to_string()).or_else(|| record.source_ipv6.map(|ip| ip.to_string()))
            };
            let Some(server_ip) = server_ip else { continue };

            let bytes = record.octet_delta_count.unwrap_or(0);
            let stats = per_server.entry(server_ip).or_default();
            if is_query {
                stats.query_count += 1;
                stats.query_bytes += bytes;
            } else {
                stats.response_count += 1;
                stats.response_bytes += bytes;
            }
        }

        if per_server.is_empty() {
            return Ok(());
        }

        let bucket = truncate_to_bucket(Utc::now());
        let router_id = device.and_then(|d| d.id);

        for (server_ip, stats) in per_server {
            let filter = doc! {
                "routerIp": &decoded.src_ip,
                "dnsServerIp": &server_ip,
                "timestamp": bucket,
            };
            let timeout = stats.query_count.saturating_sub(stats.response_count);
            let mut set_on_insert = doc! {
                "routerIp": &decoded.src_ip,
                "dnsServerIp": &server_ip,
                "timestamp": bucket,
                "createdAt": Utc::now(),
            };
            if let Some(id) = router_id {
                set_on_insert.insert("routerId", id);
            }
            let update = doc! {
                "$inc": {
                    "totalQueries": stats.query_count as i64,
                    "totalResponses": stats.response_count as i64,
                    "queryBytes": stats.query_bytes as i64,
                    "responseBytes": stats.response_bytes as i64,
                    "totalBytes": (stats.query_bytes + stats.response_bytes) as i64,
                },
                "$set": { "updatedAt": Utc::now(), "timeoutCount": timeout as i64 },
                "$setOnInsert": set_on_insert,
            };

            let result = self
                .collection
                .update_one(filter.clone(), update)
                .upsert(true)
                .await
                .map_err(StorageError::Operation)?;

            if result.modified_count > 0 || result.upserted_id.is_some() {
                if let Some(mut metric) = self.collection.find_one(filter.clone()).await.map_err(StorageError::Operation)? {
                    if metric.total_queries > 0 {
                        metric.success_rate = metric.total_responses as f64 / metric.total_queries as f64 * 100.0;
                        metric.timeout_percentage = metric.timeout_count as f64 / metric.total_queries as f64 * 100.0;
                        self.collection
                            .update_one(
                                filter,
                                doc! { "$set": {
                                    "successRate": metric.success_rate,
                                    "timeoutPercentage": metric.timeout_percentage,
                                } },
                            )
                            .await
                            .map_err(StorageError::Operation)?;
                    }
                }
            }
        }

        Ok(())
    }
}
