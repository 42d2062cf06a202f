//! Binary entry point: wires the IPFIX ingest pipeline, metric processors,
//! SNMP trap listener, polling engine, schedulers, and HTTP/WebSocket
//! control surface together and runs them to completion.
//!
//! Grounded on the original service's `main.go`/`wire.go`-style startup:
//! load config, connect storage and the message bus, start every
//! background worker pool, serve HTTP until the process is killed.

use std::sync::Arc;

use flow_telemetry::api::{self, AppState};
use flow_telemetry::auth::StaticTokenAuth;
use flow_telemetry::bus::Queue;
use flow_telemetry::config::Config;
use flow_telemetry::hub::EventHub;
use flow_telemetry::ingest::{decoder, listener};
use flow_telemetry::metrics::{dns_quality::DnsQualityMetricProcessor, interface::InterfaceMetricProcessor, ip_version::IpVersionMetricProcessor, worker as metric_worker, MetricRegistry};
use flow_telemetry::polling::collectors;
use flow_telemetry::polling::PollingEngine;
use flow_telemetry::scheduler::{collector::UsageCollectorScheduler, midnight::AverageRollupScheduler, SchedulerManager};
use flow_telemetry::snmp::listener as trap_listener;
use flow_telemetry::storage::{self, DeviceRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env();

    let database = storage::connect(&config.mongo_uri, &config.mongo_database).await?;
    let devices = Arc::new(DeviceRepository::new(&database));

    let raw_queue = Arc::new(Queue::connect(&config.amqp_url, &config.raw_queue_name).await?);
    let decoded_queue = Arc::new(Queue::connect(&config.amqp_url, &config.decoded_queue_name).await?);

    let registry = Arc::new(MetricRegistry::new(vec![
        Box::new(IpVersionMetricProcessor::new(&database)),
        Box::new(DnsQualityMetricProcessor::new(&database)),
        Box::new(InterfaceMetricProcessor::new(&database)),
    ]));

    let hub = Arc::new(EventHub::new());
    let auth: Arc<dyn flow_telemetry::auth::AuthService> = Arc::new(StaticTokenAuth::new(config.auth_token.clone()));
    let vendor_collectors = Arc::new(collectors::default_registry());
    let engine = Arc::new(PollingEngine::new(hub.clone(), devices.clone(), vendor_collectors.clone()));

    let schedulers = Arc::new(SchedulerManager::new());
    for (metric, series) in [
        ("cpu_usage", "cpu"),
        ("memory_usage", "memory"),
        ("disk_usage", "disk"),
        ("temperature", "temperature"),
    ] {
        schedulers
            .register(Arc::new(UsageCollectorScheduler::new(metric, series, devices.clone(), vendor_collectors.clone())))
            .await;
        schedulers.register(Arc::new(AverageRollupScheduler::new(series, devices.clone()))).await;
    }
    schedulers.start_all().await;

    tokio::spawn(listener::run(config.ipfix_listen, raw_queue.clone()));
    decoder::spawn_pool(config.decoder_worker_count, raw_queue.clone(), decoded_queue.clone()).await;
    metric_worker::spawn_pool(config.metric_worker_count, decoded_queue.clone(), registry.clone(), devices.clone()).await;
    tokio::spawn(trap_listener::run(config.trap_listen, devices.clone(), hub.clone()));

    let state = AppState {
        hub,
        engine,
        devices,
        collectors: vendor_collectors,
        auth,
    };
    let app = api::router(state);

    log::info!("flow-telemetryd listening on {}", config.http_listen);
    let listener = tokio::net::TcpListener::bind(config.http_listen).await?;
    axum::serve(listener, app).await?;

    schedulers.stop_all().await;
    Ok(())
}
