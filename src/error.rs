//! Service-level error types.
//!
//! The wire codecs (`ipfix::error`, `snmp::ber`) keep the teacher's hand-rolled
//! `Display`/`Error` style. Everything above the wire sits on `thiserror`,
//! matching the pattern used for service errors elsewhere in the example pack.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to connect to broker at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: lapin::Error,
    },
    #[error("failed to declare queue {name}: {source}")]
    Declare {
        name: String,
        #[source]
        source: lapin::Error,
    },
    #[error("publish failed: {0}")]
    Publish(#[source] lapin::Error),
    #[error("consume failed: {0}")]
    Consume(#[source] lapin::Error),
    #[error("message was not valid JSON: {0}")]
    Serialization(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage connection failed: {0}")]
    Connect(#[source] mongodb::error::Error),
    #[error("storage operation failed: {0}")]
    Operation(#[source] mongodb::error::Error),
    #[error("document failed to deserialize: {0}")]
    Deserialize(#[source] bson::de::Error),
    #[error("value failed to serialize to BSON: {0}")]
    Serialize(#[source] bson::ser::Error),
}

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("invalid SNMP target address '{0}'")]
    InvalidTarget(String),
    #[error("SNMP transport error talking to {target}: {source}")]
    Transport {
        target: String,
        #[source]
        source: crate::snmp::client::SnmpError,
    },
    #[error("metric '{0}' is not supported by this collector")]
    UnsupportedMetric(String),
}

#[derive(Debug, Error)]
pub enum PollingError {
    #[error("device {0} not found")]
    DeviceNotFound(String),
    #[error("no collector registered for vendor '{0}'")]
    NoCollector(String),
    #[error("required metric '{metric}' unavailable (tried {data_key} and fallbacks {fallback_keys:?})")]
    MetricUnavailable {
        metric: String,
        data_key: String,
        fallback_keys: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum TrapError {
    #[error("trap packet too short to contain an SNMP message")]
    Truncated,
    #[error("BER decode error: {0}")]
    Ber(#[from] crate::snmp::ber::BerError),
    #[error("packet carries no recognizable trap OID")]
    MissingTrapOid,
    #[error("trap OID {0} is not handled by any registered parser")]
    Unhandled(String),
}

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("device id is required (device_id, router_id, olt_id, or switch_id)")]
    MissingDeviceId,
    #[error("vendor parameter is required")]
    MissingVendor,
    #[error("auth token missing or invalid")]
    Unauthorized,
}
