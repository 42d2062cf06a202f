//! A single metric's periodic poller: one ticker running at the metric's own
//! interval, tracking the last value it resolved and when.
//!
//! Grounded on `original_source/services/snmpService.go`'s per-metric
//! ticker (`metric.Ticker = time.NewTicker(metric.Config.Interval)` in
//! `StartCollection`) and `performMetricCollection`/`collectMetricData`'s
//! collect-then-broadcast body, generalized here to run at the metric's own
//! configured interval instead of one shared device-wide rate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{error, warn};
use tokio::sync::watch;

use crate::device::{Device, NetworkDevice, Vendor};
use crate::hub::EventHub;
use crate::polling::collector::{resolve_metric, Collector, MetricSpec};
use crate::polling::engine::SnmpMetricMessage;
use crate::storage::DeviceRepository;

/// Owns one metric's ticker plus the last value/timestamp it resolved,
/// matching the Polling Collection invariant: interval, last value, last
/// update time, ticker, one runner per configured metric.
pub struct MetricRunner {
    spec: MetricSpec,
    last_value: Option<f64>,
    last_update: Option<DateTime<Utc>>,
}

impl MetricRunner {
    pub fn new(spec: MetricSpec) -> Self {
        MetricRunner { spec, last_value: None, last_update: None }
    }

    pub fn interval(&self) -> Duration {
        self.spec.interval
    }

    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Collects immediately, then on every tick until `stop_rx` reports
    /// true, mirroring `collectMetricData`'s immediate-collection-then-
    /// ticker-loop shape. Re-resolves the collector from `collectors` on
    /// every tick rather than holding a reference across the loop, matching
    /// how `PollingEngine` itself looks it up per collection attempt.
    pub async fn run(
        mut self,
        device: Device,
        collectors: Arc<HashMap<Vendor, Box<dyn Collector>>>,
        devices: Arc<DeviceRepository>,
        hub: Arc<EventHub>,
        mut stop_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(self.spec.interval);
        loop {
            self.tick(&device, collectors.as_ref(), &devices, &hub).await;
            tokio::select! {
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {}
            }
        }
    }

    async fn tick(
        &mut self,
        device: &Device,
        collectors: &HashMap<Vendor, Box<dyn Collector>>,
        devices: &DeviceRepository,
        hub: &EventHub,
    ) {
        let Some(collector) = collectors.get(&device.vendor) else { return };
        let (value, error) = match resolve_metric(collector.as_ref(), device, &self.spec).await {
            Ok(Some(value)) => (value.as_f64(), None),
            Ok(None) => (None, None),
            Err(err) => (None, Some(err.to_string())),
        };

        match (value, &error) {
            (Some(v), _) => {
                self.last_value = Some(v);
                self.last_update = Some(Utc::now());
                if let Some(id) = device.id {
                    if matches!(self.spec.name.as_str(), "cpu_usage" | "memory_usage" | "disk_usage" | "temperature") {
                        let series = self.spec.name.trim_end_matches("_usage");
                        if let Err(e) = devices.push_usage_sample(&id, series, v).await {
                            error!("failed to persist {series} sample for {}: {e}", device.name);
                        }
                    }
                }
            }
            (None, Some(err)) => warn!("metric '{}' unavailable for device {}: {err}", self.spec.name, device.name),
            (None, None) => {}
        }

        // Broadcast unconditionally - including a `None` value for optional
        // metrics with nothing to report - matching `performMetricCollection`.
        let message = SnmpMetricMessage {
            device_id: device.device_id(),
            device_name: device.name.clone(),
            vendor: device.vendor.clone(),
            metric: self.spec.name.clone(),
            value,
            error,
            timestamp: Utc::now(),
        };
        hub.broadcast_metric(message).await;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::device::{Device, DeviceKind};
    use crate::error::CollectorError;
    use crate::polling::collector::MetricValue;

    struct FakeCollector;

    #[async_trait]
    impl Collector for FakeCollector {
        fn vendor(&self) -> Vendor {
            Vendor::Other("fake".into())
        }

        fn supported_metrics(&self) -> Vec<String> {
            vec!["cpu_usage".into()]
        }

        fn metric_mapping(&self) -> HashMap<String, MetricSpec> {
            HashMap::new()
        }

        async fn collect(&self, _device: &Device) -> Result<HashMap<String, MetricValue>, CollectorError> {
            Ok(HashMap::from([("cpu".to_string(), MetricValue::Float(42.0))]))
        }
    }

    fn fake_device() -> Device {
        Device {
            id: None,
            kind: DeviceKind::Router,
            active: true,
            vendor: Vendor::Other("fake".into()),
            name: "fake-device".into(),
            description: String::new(),
            access_user: String::new(),
            access_password: String::new(),
            ip_address: "127.0.0.1".into(),
            snmp_community: "public".into(),
            snmp_port: 161,
            memory_usage_today: vec![],
            month_average_memory_usage: vec![],
            cpu_usage_today: vec![],
            month_average_cpu_usage: vec![],
            disk_usage_today: vec![],
            month_average_disk_usage: vec![],
            temperature_today: vec![],
            month_average_temperature: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn tick_records_its_own_last_value_and_keeps_its_own_interval() {
        let cpu_spec = MetricSpec {
            name: "cpu_usage".into(),
            interval: Duration::from_millis(5),
            data_key: "cpu".into(),
            fallback_keys: vec![],
            required: false,
        };
        let slow_spec = MetricSpec {
            name: "cpu_usage".into(),
            interval: Duration::from_secs(120),
            data_key: "cpu".into(),
            fallback_keys: vec![],
            required: false,
        };
        let mut fast = MetricRunner::new(cpu_spec);
        let slow = MetricRunner::new(slow_spec);
        assert_ne!(fast.interval(), slow.interval());
        assert!(fast.last_value().is_none());

        let mut collectors: HashMap<Vendor, Box<dyn Collector>> = HashMap::new();
        collectors.insert(Vendor::Other("fake".into()), Box::new(FakeCollector));
        let db = crate::storage::connect("mongodb://127.0.0.1:27017", "flow_telemetry_test").await.unwrap();
        let devices = Arc::new(DeviceRepository::new(&db));
        let hub = EventHub::new();

        fast.tick(&fake_device(), &collectors, &devices, &hub).await;
        assert_eq!(fast.last_value(), Some(42.0));
        assert!(fast.last_update().is_some());
    }
}
