//! Property 7: fallback-key metric resolution.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use flow_telemetry::device::{Device, DeviceKind, Vendor};
use flow_telemetry::error::CollectorError;
use flow_telemetry::polling::collector::resolve_metric;
use flow_telemetry::polling::{Collector, MetricSpec, MetricValue};

struct FakeCollector {
    snapshot: HashMap<String, MetricValue>,
}

#[async_trait]
impl Collector for FakeCollector {
    fn vendor(&self) -> Vendor {
        Vendor::Other("fake".into())
    }

    fn supported_metrics(&self) -> Vec<String> {
        self.snapshot.keys().cloned().collect()
    }

    fn metric_mapping(&self) -> HashMap<String, MetricSpec> {
        HashMap::new()
    }

    async fn collect(&self, _device: &Device) -> Result<HashMap<String, MetricValue>, CollectorError> {
        Ok(self.snapshot.clone())
    }
}

fn test_device() -> Device {
    Device {
        id: None,
        kind: DeviceKind::Router,
        active: true,
        vendor: Vendor::Other("fake".into()),
        name: "r1".into(),
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

fn spec(data_key: &str, fallback_keys: &[&str], required: bool) -> MetricSpec {
    MetricSpec {
        name: "metric".into(),
        interval: Duration::from_secs(5),
        data_key: data_key.into(),
        fallback_keys: fallback_keys.iter().map(|s| s.to_string()).collect(),
        required,
    }
}

#[tokio::test]
async fn resolves_via_fallback_key() {
    let collector = FakeCollector { snapshot: HashMap::from([("a".to_string(), MetricValue::Integer(1))]) };
    let device = test_device();
    let spec = spec("x", &["a", "b"], false);

    let value = resolve_metric(&collector, &device, &spec).await.unwrap();
    assert_eq!(value.unwrap().as_f64(), Some(1.0));
}

#[tokio::test]
async fn resolves_via_primary_data_key() {
    let collector = FakeCollector { snapshot: HashMap::from([("a".to_string(), MetricValue::Integer(1))]) };
    let device = test_device();
    let spec = spec("a", &[], false);

    let value = resolve_metric(&collector, &device, &spec).await.unwrap();
    assert_eq!(value.unwrap().as_f64(), Some(1.0));
}

#[tokio::test]
async fn required_metric_with_no_match_errors() {
    let collector = FakeCollector { snapshot: HashMap::from([("c".to_string(), MetricValue::Integer(1))]) };
    let device = test_device();
    let spec = spec("x", &["y"], true);

    let result = resolve_metric(&collector, &device, &spec).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn optional_metric_with_no_match_yields_none() {
    let collector = FakeCollector { snapshot: HashMap::from([("c".to_string(), MetricValue::Integer(1))]) };
    let device = test_device();
    let spec = spec("x", &["y"], false);

    let value = resolve_metric(&collector, &device, &spec).await.unwrap();
    assert!(value.is_none());
}
