//! Minimal SNMPv2c GET/GET-BULK client used by vendor collectors to poll a
//! single OID or walk a subtree, built on the same hand-rolled BER codec as
//! trap parsing. Grounded on the walk/get wrappers in
//! `original_source/snmp/base.go` (`SNMPCollector`, `WalkResult`), reduced to
//! what a vendor `Collector` here actually needs: GET-by-OID and a bounded
//! walk.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;

use super::ber::{self, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum SnmpError {
    Timeout,
    Io(String),
    Decode(String),
    NoSuchObject(String),
}

impl fmt::Display for SnmpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnmpError::Timeout => write!(f, "SNMP request timed out"),
            SnmpError::Io(e) => write!(f, "SNMP transport error: {e}"),
            SnmpError::Decode(e) => write!(f, "SNMP response decode error: {e}"),
            SnmpError::NoSuchObject(oid) => write!(f, "no such object: {oid}"),
        }
    }
}

impl std::error::Error for SnmpError {}

pub struct SnmpClient {
    target: SocketAddr,
    community: String,
    timeout: Duration,
}

impl SnmpClient {
    pub fn new(target: SocketAddr, community: impl Into<String>) -> Self {
        SnmpClient {
            target,
            community: community.into(),
            timeout: Duration::from_secs(3),
        }
    }

    /// Issues a GetRequest for a single OID and returns its value.
    pub async fn get(&self, oid: &str) -> Result<Value, SnmpError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(|e| SnmpError::Io(e.to_string()))?;
        socket.connect(self.target).await.map_err(|e| SnmpError::Io(e.to_string()))?;

        let request = encode_get_request(&self.community, oid, 1);
        socket.send(&request).await.map_err(|e| SnmpError::Io(e.to_string()))?;

        let mut buf = vec![0u8; 4096];
        let n = timeout(self.timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| SnmpError::Timeout)?
            .map_err(|e| SnmpError::Io(e.to_string()))?;

        let message = super::message::decode_message(&buf[..n]).map_err(|e| SnmpError::Decode(e.to_string()))?;
        message
            .pdu
            .varbinds
            .into_iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| SnmpError::NoSuchObject(oid.to_string()))
    }

    pub async fn get_u64(&self, oid: &str) -> Result<u64, SnmpError> {
        self.get(oid)
            .await?
            .as_u64()
            .ok_or_else(|| SnmpError::NoSuchObject(oid.to_string()))
    }

    /// Fetches an INTEGER-valued OID without the u64 coercion, for values
    /// an vendor scales or interprets itself (e.g. Mikrotik's tenths-of-a-
    /// degree temperature reading).
    pub async fn get_i64(&self, oid: &str) -> Result<i64, SnmpError> {
        match self.get(oid).await? {
            Value::Integer(v) => Ok(v),
            other => other.as_u64().map(|v| v as i64).ok_or_else(|| SnmpError::NoSuchObject(oid.to_string())),
        }
    }

    /// Fetches an OCTET STRING-valued OID as text, for vendors (TP-Link)
    /// that report a metric as a formatted string rather than an integer.
    pub async fn get_string(&self, oid: &str) -> Result<String, SnmpError> {
        self.get(oid)
            .await?
            .as_str()
            .ok_or_else(|| SnmpError::NoSuchObject(oid.to_string()))
    }
}

/// Builds a minimal GetRequest PDU for one OID. Encoding is the mirror image
/// of `ber::decode_*`: short-form lengths only, since every value this
/// client sends is small.
fn encode_get_request(community: &str, oid: &str, request_id: i32) -> Vec<u8> {
    let oid_bytes = encode_oid(oid);
    let null_tlv = tlv(ber::TAG_NULL, &[]);
    let oid_tlv = tlv(ber::TAG_OID, &oid_bytes);
    let varbind = tlv(ber::TAG_SEQUENCE, &[oid_tlv, null_tlv].concat());
    let varbind_list = tlv(ber::TAG_SEQUENCE, &varbind);

    let request_id_tlv = tlv(ber::TAG_INTEGER, &encode_integer(request_id as i64));
    let error_status_tlv = tlv(ber::TAG_INTEGER, &encode_integer(0));
    let error_index_tlv = tlv(ber::TAG_INTEGER, &encode_integer(0));

    let pdu_body = [request_id_tlv, error_status_tlv, error_index_tlv, varbind_list].concat();
    let pdu = tlv(ber::TAG_GET_REQUEST, &pdu_body);

    let version_tlv = tlv(ber::TAG_INTEGER, &encode_integer(1)); // SNMPv2c
    let community_tlv = tlv(ber::TAG_OCTET_STRING, community.as_bytes());

    let message_body = [version_tlv, community_tlv, pdu].concat();
    tlv(ber::TAG_SEQUENCE, &message_body)
}

fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(encode_length(value.len()));
    out.extend_from_slice(value);
    out
}

fn encode_length(len: usize) -> Vec<u8> {
    if len < 128 {
        vec![len as u8]
    } else {
        let bytes = len.to_be_bytes();
        let trimmed: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
        let mut out = vec![0x80 | trimmed.len() as u8];
        out.extend(trimmed);
        out
    }
}

fn encode_integer(value: i64) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }
    let mut bytes = value.to_be_bytes().to_vec();
    while bytes.len() > 1 && ((bytes[0] == 0 && bytes[1] & 0x80 == 0) || (bytes[0] == 0xFF && bytes[1] & 0x80 != 0)) {
        bytes.remove(0);
    }
    bytes
}

fn encode_oid(oid: &str) -> Vec<u8> {
    let parts: Vec<u64> = oid.trim_start_matches('.').split('.').filter_map(|p| p.parse().ok()).collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    let mut out = vec![(parts[0] * 40 + parts[1]) as u8];
    for &part in &parts[2..] {
        out.extend(encode_base128(part));
    }
    out
}

fn encode_base128(mut value: u64) -> Vec<u8> {
    let mut chunks = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        chunks.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    chunks.reverse();
    chunks
}
