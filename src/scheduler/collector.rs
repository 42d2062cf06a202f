//! 10-minute usage collector: every active device gets its CPU/memory/disk
//! usage polled and appended to today's rolling series.
//!
//! Grounded on `cpuCollectorScheduler.go`'s `CPUScheduler`: a 10-minute
//! initial delay before the first collection, then a 10-minute ticker,
//! fanning out one collection per device. Generalized here to run once per
//! rolling-series metric rather than being Mikrotik-CPU-specific - any
//! vendor whose collector maps the metric participates.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::watch;

use crate::device::{Device, NetworkDevice, Vendor};
use crate::polling::collector::{resolve_metric, Collector};
use crate::scheduler::Scheduler;
use crate::storage::DeviceRepository;

const INITIAL_DELAY: Duration = Duration::from_secs(600);
const INTERVAL: Duration = Duration::from_secs(600);

pub struct UsageCollectorScheduler {
    /// Metric key as registered in a collector's `metric_mapping`, e.g. `"cpu_usage"`.
    metric: String,
    /// Rolling-series name used by [`DeviceRepository`], e.g. `"cpu"`.
    series: String,
    devices: Arc<DeviceRepository>,
    collectors: Arc<HashMap<Vendor, Box<dyn Collector>>>,
}

impl UsageCollectorScheduler {
    pub fn new(metric: impl Into<String>, series: impl Into<String>, devices: Arc<DeviceRepository>, collectors: Arc<HashMap<Vendor, Box<dyn Collector>>>) -> Self {
        UsageCollectorScheduler {
            metric: metric.into(),
            series: series.into(),
            devices,
            collectors,
        }
    }

    async fn collect_all(&self) {
        let devices = match self.devices.find_active().await {
            Ok(devices) => devices,
            Err(err) => {
                warn!("usage collector '{}' failed to list active devices: {err}", self.metric);
                return;
            }
        };

        for device in devices {
            self.collect_one(&device).await;
        }
    }

    async fn collect_one(&self, device: &Device) {
        let Some(collector) = self.collectors.get(&device.vendor) else { return };
        let Some(spec) = collector.metric_mapping().get(&self.metric).cloned() else { return };
        let Some(device_id) = device.id else { return };

        match resolve_metric(collector.as_ref(), device, &spec).await {
            Ok(Some(value)) => {
                if let Some(value) = value.as_f64() {
                    if let Err(err) = self.devices.push_usage_sample(&device_id, &self.series, value).await {
                        warn!("failed to record {} sample for {}: {err}", self.series, device.name);
                    }
                }
            }
            Ok(None) => debug!("metric '{}' unavailable for {}", self.metric, device.name),
            Err(err) => warn!("metric '{}' collection failed for {}: {err}", self.metric, device.name),
        }
    }
}

#[async_trait]
impl Scheduler for UsageCollectorScheduler {
    fn name(&self) -> &str {
        &self.metric
    }

    async fn run(self: Arc<Self>, mut stop_rx: watch::Receiver<bool>) {
        tokio::select! {
            _ = tokio::time::sleep(INITIAL_DELAY) => {}
            _ = stop_rx.changed() => return,
        }
        self.collect_all().await;

        let mut ticker = tokio::time::interval(INTERVAL);
        ticker.tick().await; // consume the immediate first tick
        loop {
            tokio::select! {
                _ = ticker.tick() => self.collect_all().await,
                _ = stop_rx.changed() => return,
            }
        }
    }
}
