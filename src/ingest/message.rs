//! Message shapes carried on the raw and decoded queues.
//!
//! Grounded on `original_source/netflow/types.go`'s `PacketMessage` and
//! `DecodedIPFIXMessage`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ipfix::FlowRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketMessage {
    pub raw: Vec<u8>,
    pub src_ip: String,
    pub src_port: u16,
    pub received: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedMessage {
    pub src_ip: String,
    pub src_port: u16,
    pub received: DateTime<Utc>,
    pub observation_domain_id: u32,
    pub sequence_number: u32,
    pub flow_records: Vec<FlowRecord>,
}
