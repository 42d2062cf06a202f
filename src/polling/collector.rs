//! The vendor `Collector` trait and the fallback-key metric resolution
//! algorithm every poll goes through.
//!
//! Grounded on `original_source/services/snmpService.go`'s
//! `createGenericCollectFunction`: try the collector's own `collect_metric`
//! first; if it doesn't implement that metric, fall back to a generic
//! `collect()` snapshot and pull `data_key`, then each of `fallback_keys` in
//! order; if none are present, the result is `None` for optional metrics or
//! an error for required ones.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::device::{Device, Vendor};
use crate::error::CollectorError;

#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Float(f64),
    Integer(i64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Float(v) => Some(*v),
            MetricValue::Integer(v) => Some(*v as f64),
            MetricValue::Text(_) => None,
        }
    }
}

/// Describes how to resolve one polled metric: its canonical key, the keys
/// to try in a generic `collect()` snapshot if the collector has no
/// dedicated `collect_metric` support, whether its absence is an error, and
/// the polling cadence this metric runs at - each metric owns its own
/// interval rather than sharing one process-wide value, matching
/// `original_source/config/metric_mappings.go`'s per-metric `Interval`.
#[derive(Debug, Clone)]
pub struct MetricSpec {
    pub name: String,
    pub interval: Duration,
    pub data_key: String,
    pub fallback_keys: Vec<String>,
    pub required: bool,
}

/// A vendor's SNMP collection behavior. `collect` returns a best-effort
/// snapshot of every metric the device exposes in one round trip (mirroring
/// the original's generic `Collect()`); `collect_metric` lets a vendor
/// short-circuit straight to one metric when cheaper to fetch individually.
#[async_trait]
pub trait Collector: Send + Sync {
    fn vendor(&self) -> Vendor;

    fn supported_metrics(&self) -> Vec<String>;

    /// Metric name -> dotted-path keys this vendor's `collect()` snapshot
    /// populates, mirroring `VendorMetricMappings` in the original.
    fn metric_mapping(&self) -> HashMap<String, MetricSpec>;

    async fn collect(&self, device: &Device) -> Result<HashMap<String, MetricValue>, CollectorError>;

    async fn collect_metric(&self, device: &Device, metric: &str) -> Result<Option<MetricValue>, CollectorError> {
        let _ = (device, metric);
        Ok(None)
    }
}

/// Resolves one metric against a collector, following the original's
/// three-step fallback: dedicated `collect_metric`, then `data_key` in a
/// snapshot, then `fallback_keys` in order.
pub async fn resolve_metric(
    collector: &dyn Collector,
    device: &Device,
    spec: &MetricSpec,
) -> Result<Option<MetricValue>, CollectorError> {
    if let Some(value) = collector.collect_metric(device, &spec.name).await? {
        return Ok(Some(value));
    }

    let snapshot = collector.collect(device).await?;
    if let Some(value) = snapshot.get(&spec.data_key) {
        return Ok(Some(value.clone()));
    }
    for key in &spec.fallback_keys {
        if let Some(value) = snapshot.get(key) {
            return Ok(Some(value.clone()));
        }
    }

    if spec.required {
        Err(CollectorError::UnsupportedMetric(spec.name.clone()))
    } else {
        Ok(None)
    }
}
