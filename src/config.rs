//! Runtime configuration, read from the environment.
//!
//! Mirrors the original service's env-var driven configuration
//! (`IPFIX_LISTEN`/`IPFIX_PORT`, `SNMP_TRAP_COMMUNITY`, ...) but centralizes it
//! into one struct read once at startup instead of scattered `os.Getenv` calls.

use std::env;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub ipfix_listen: SocketAddr,
    pub trap_listen: SocketAddr,
    pub snmp_trap_community: String,
    pub amqp_url: String,
    pub raw_queue_name: String,
    pub decoded_queue_name: String,
    pub decoder_worker_count: usize,
    pub metric_worker_count: usize,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub http_listen: SocketAddr,
    pub auth_token: String,
}

impl Config {
    /// Loads configuration from the environment, falling back to the same
    /// defaults the original service used.
    pub fn from_env() -> Self {
        Config {
            ipfix_listen: parse_addr("IPFIX_LISTEN", "0.0.0.0", "IPFIX_PORT", "4739"),
            trap_listen: parse_addr("SNMP_TRAP_LISTEN", "0.0.0.0", "SNMP_TRAP_PORT", "1162"),
            snmp_trap_community: env::var("SNMP_TRAP_COMMUNITY").unwrap_or_else(|_| "public".into()),
            amqp_url: env::var("AMQP_URL").unwrap_or_else(|_| "amqp://127.0.0.1:5672/%2f".into()),
            raw_queue_name: env::var("RAW_QUEUE_NAME").unwrap_or_else(|_| "netflow.raw".into()),
            decoded_queue_name: env::var("DECODED_QUEUE_NAME").unwrap_or_else(|_| "netflow.decoded".into()),
            decoder_worker_count: env::var("DECODER_WORKER_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            metric_worker_count: env::var("METRIC_WORKER_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            mongo_uri: env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://127.0.0.1:27017".into()),
            mongo_database: env::var("MONGO_DATABASE").unwrap_or_else(|_| "flow_telemetry".into()),
            http_listen: env::var("HTTP_LISTEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| "0.0.0.0:8080".parse().unwrap()),
            auth_token: env::var("AUTH_TOKEN").unwrap_or_default(),
        }
    }
}

fn parse_addr(host_var: &str, host_default: &str, port_var: &str, port_default: &str) -> SocketAddr {
    let host = env::var(host_var).unwrap_or_else(|_| host_default.into());
    let port = env::var(port_var).unwrap_or_else(|_| port_default.into());
    format!("{host}:{port}")
        .parse()
        .unwrap_or_else(|_| format!("{host_default}:{port_default}").parse().unwrap())
}
