//! TP-Link P7000 trap handler. The original's vendor-specific branch never
//! grew beyond the RFC fallback plus a bare enterprise-OID passthrough event
//! (no vendor-specific varbind extraction was ever added) - ported as-is
//! rather than inventing fields that don't exist upstream.
//!
//! Grounded on `original_source/snmp/trap/handlers/tplinkp700Handler.go`.

use chrono::Utc;

use crate::device::{Device, Vendor};
use crate::error::TrapError;
use crate::snmp::ber::VarBind;
use crate::snmp::trap::{extract_trap_oid, oid_has_prefix, TrapEvent, TrapHandler};

use super::rfc::RfcTrapHandler;

const BASE_OID: &str = "1.3.6.1.4.1.11863";

pub struct TplinkP7000TrapHandler {
    rfc: RfcTrapHandler,
}

impl TplinkP7000TrapHandler {
    pub fn new() -> Self {
        TplinkP7000TrapHandler { rfc: RfcTrapHandler::new() }
    }
}

impl Default for TplinkP7000TrapHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TrapHandler for TplinkP7000TrapHandler {
    fn vendor(&self) -> Vendor {
        Vendor::TplinkP7000
    }

    fn can_handle(&self, trap_oid: &str) -> bool {
        oid_has_prefix(trap_oid, BASE_OID) || self.rfc.can_handle(trap_oid)
    }

    fn parse(&self, varbinds: &[VarBind], device: &Device) -> Result<TrapEvent, TrapError> {
        let trap_oid = extract_trap_oid(varbinds).ok_or(TrapError::MissingTrapOid)?;

        if self.rfc.can_handle(&trap_oid) {
            return self.rfc.parse(varbinds, device);
        }

        Ok(TrapEvent {
            device_id: device.id.map(|o| o.to_hex()).unwrap_or_default(),
            device_name: device.name.clone(),
            device_ip: device.ip_address.clone(),
            vendor: device.vendor.clone(),
            event_type: "tplinkp7000_generic_trap".into(),
            severity: "info".into(),
            message: "generic TP-Link P7000 trap received".into(),
            data: Default::default(),
            trap_oid,
            timestamp: Utc::now(),
        })
    }
}
