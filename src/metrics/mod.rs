//! Flow-derived metric processors: each takes a decoded IPFIX message plus
//! the (possibly unknown) source device and folds it into a bucketed
//! persisted metric.
//!
//! Grounded on `original_source/netflow/metricService.go`'s `MetricProcessor`
//! interface and global processor registry.

pub mod dns_quality;
pub mod interface;
pub mod ip_version;
pub mod worker;

use async_trait::async_trait;

use crate::device::Device;
use crate::error::StorageError;
use crate::ingest::DecodedMessage;

#[async_trait]
pub trait MetricProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn process(&self, device: Option<&Device>, decoded: &DecodedMessage) -> Result<(), StorageError>;
}

/// Holds every registered processor. Built once at startup
/// (`InitializeMetrics` in the original) and shared across decoded-queue
/// consumers.
pub struct MetricRegistry {
    processors: Vec<Box<dyn MetricProcessor>>,
}

impl MetricRegistry {
    pub fn new(processors: Vec<Box<dyn MetricProcessor>>) -> Self {
        MetricRegistry { processors }
    }

    pub fn processors(&self) -> &[Box<dyn MetricProcessor>] {
        &self.processors
    }
}
