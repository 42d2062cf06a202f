//! Normalized trap event and the per-vendor `TrapHandler` dispatch.
//!
//! `TrapEvent` merges the richer, more recently touched
//! `thinkOltHandler.go` variant's fields (including `severity`) with the
//! identity fields every other handler also populates - see DESIGN.md for
//! the duplicate-source-file resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::device::{Device, Vendor};
use crate::error::TrapError;
use crate::snmp::ber::VarBind;

pub const OID_SNMP_TRAP_OID: &str = "1.3.6.1.6.3.1.1.4.1.0";
pub const OID_COLD_START: &str = "1.3.6.1.6.3.1.1.5.1";
pub const OID_WARM_START: &str = "1.3.6.1.6.3.1.1.5.2";
pub const OID_LINK_DOWN: &str = "1.3.6.1.6.3.1.1.5.3";
pub const OID_LINK_UP: &str = "1.3.6.1.6.3.1.1.5.4";
pub const OID_AUTH_FAILURE: &str = "1.3.6.1.6.3.1.1.5.5";
pub const OID_IF_INDEX: &str = "1.3.6.1.2.1.2.2.1.1";
pub const OID_IF_DESCR: &str = "1.3.6.1.2.1.2.2.1.2";
pub const OID_IF_ADMIN_STATUS: &str = "1.3.6.1.2.1.2.2.1.7";
pub const OID_IF_OPER_STATUS: &str = "1.3.6.1.2.1.2.2.1.8";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapEvent {
    pub device_id: String,
    pub device_name: String,
    pub device_ip: String,
    pub vendor: Vendor,
    pub event_type: String,
    pub severity: String,
    pub message: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
    pub trap_oid: String,
    pub timestamp: DateTime<Utc>,
}

/// Extracts the trap OID varbind (`1.3.6.1.6.3.1.1.4.1.0`)'s value, without
/// assuming its position in the varbind list.
pub fn extract_trap_oid(varbinds: &[VarBind]) -> Option<String> {
    varbinds
        .iter()
        .find(|(oid, _)| oid_suffix_matches(oid, OID_SNMP_TRAP_OID))
        .and_then(|(_, value)| value.as_str())
}

/// Suffix match after stripping any leading dot, matching the original's
/// `contains` helper used to compare OIDs with and without a leading dot.
pub fn oid_suffix_matches(oid: &str, target: &str) -> bool {
    oid.trim_start_matches('.') == target.trim_start_matches('.')
}

/// Prefix containment after stripping leading dots from both sides, used by
/// vendor handlers to test an OID against an enterprise base arc rather than
/// an exact trap OID.
pub fn oid_has_prefix(oid: &str, prefix: &str) -> bool {
    oid.trim_start_matches('.').starts_with(prefix.trim_start_matches('.'))
}

pub fn varbind_str(varbinds: &[VarBind], oid: &str) -> Option<String> {
    varbinds
        .iter()
        .find(|(candidate, _)| oid_suffix_matches(candidate, oid))
        .and_then(|(_, value)| value.as_str().or_else(|| value.as_u64().map(|n| n.to_string())))
}

pub trait TrapHandler: Send + Sync {
    fn vendor(&self) -> Vendor;

    fn can_handle(&self, trap_oid: &str) -> bool;

    fn parse(&self, varbinds: &[VarBind], device: &Device) -> Result<TrapEvent, TrapError>;
}
