//! Property 6: starting a collection twice is a no-op, and stopping is
//! idempotent and actually joins its tasks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use flow_telemetry::device::{Device, DeviceKind, Vendor};
use flow_telemetry::error::CollectorError;
use flow_telemetry::hub::EventHub;
use flow_telemetry::polling::{Collector, MetricSpec, MetricValue, PollingEngine};
use flow_telemetry::storage::DeviceRepository;

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
        HashMap::from([(
            "cpu_usage".to_string(),
            MetricSpec {
                name: "cpu_usage".into(),
                interval: Duration::from_millis(10),
                data_key: "cpu".into(),
                fallback_keys: vec![],
                required: false,
            },
        )])
    }

    async fn collect(&self, _device: &Device) -> Result<HashMap<String, MetricValue>, CollectorError> {
        Ok(HashMap::from([("cpu".to_string(), MetricValue::Float(12.5))]))
    }
}

fn test_device() -> Device {
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

async fn test_engine() -> Arc<PollingEngine> {
    // `mongodb::Client::with_uri_str` only parses the URI; it never dials
    // out, so this stays fully offline.
    let db = flow_telemetry::storage::connect("mongodb://127.0.0.1:27017", "flow_telemetry_test")
        .await
        .expect("uri parses without connecting");
    let devices = Arc::new(DeviceRepository::new(&db));
    let mut collectors: HashMap<Vendor, Box<dyn Collector>> = HashMap::new();
    collectors.insert(Vendor::Other("fake".into()), Box::new(FakeCollector));
    Arc::new(PollingEngine::new(Arc::new(EventHub::new()), devices, Arc::new(collectors)))
}

#[tokio::test]
async fn starting_an_already_running_collection_is_a_noop() {
    let engine = test_engine().await;
    let device = test_device();

    engine.start_collection(device.clone(), vec!["cpu_usage".into()]).await.unwrap();
    assert!(engine.is_active(&device.device_id()).await);

    // second start for the same (empty) device id must not error or spawn a
    // second set of tasks.
    engine.start_collection(device.clone(), vec!["cpu_usage".into()]).await.unwrap();
    assert_eq!(engine.active_device_ids().await.len(), 1);

    engine.stop_collection(&device.device_id()).await;
    assert!(!engine.is_active(&device.device_id()).await);
}

#[tokio::test]
async fn stopping_a_collection_that_is_not_running_is_a_noop() {
    let engine = test_engine().await;
    // must return promptly rather than hang or panic.
    engine.stop_collection("never-started").await;
}

#[tokio::test]
async fn unknown_vendor_fails_to_start() {
    let engine = test_engine().await;
    let mut device = test_device();
    device.vendor = Vendor::Cisco;

    let result = engine.start_collection(device, vec!["cpu_usage".into()]).await;
    assert!(result.is_err());
}
