//! Think OLT trap handler: ONU state-change traps, falling back to the RFC
//! handler for standard interface/start-up traps.
//!
//! Grounded on `original_source/snmp/trap/handlers/thinkOltHandler.go`.

use chrono::Utc;

use crate::device::{Device, Vendor};
use crate::error::TrapError;
use crate::snmp::ber::VarBind;
use crate::snmp::trap::{extract_trap_oid, oid_has_prefix, varbind_str, TrapEvent, TrapHandler};

use super::rfc::RfcTrapHandler;

const BASE_OID: &str = "1.3.6.1.4.1.17409";
const ONU_STATE_CHANGE_OID: &str = "1.3.6.1.4.1.17409.2.2.12";
const ONU_SN_OID: &str = "1.3.6.1.4.1.17409.2.2.12.1.2.3.0";
const ONU_STATUS_OID: &str = "1.3.6.1.4.1.17409.2.2.12.1.2.4.0";

pub struct ThinkOltTrapHandler {
    rfc: RfcTrapHandler,
}

impl ThinkOltTrapHandler {
    pub fn new() -> Self {
        ThinkOltTrapHandler { rfc: RfcTrapHandler::new() }
    }

    fn base_event(&self, device: &Device, trap_oid: &str) -> TrapEvent {
        TrapEvent {
            device_id: device.id.map(|o| o.to_hex()).unwrap_or_default(),
            device_name: device.name.clone(),
            device_ip: device.ip_address.clone(),
            vendor: device.vendor.clone(),
            event_type: String::new(),
            severity: "info".into(),
            message: String::new(),
            data: Default::default(),
            trap_oid: trap_oid.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl Default for ThinkOltTrapHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TrapHandler for ThinkOltTrapHandler {
    fn vendor(&self) -> Vendor {
        Vendor::Think
    }

    fn can_handle(&self, trap_oid: &str) -> bool {
        oid_has_prefix(trap_oid, BASE_OID) || self.rfc.can_handle(trap_oid)
    }

    fn parse(&self, varbinds: &[VarBind], device: &Device) -> Result<TrapEvent, TrapError> {
        let trap_oid = extract_trap_oid(varbinds).ok_or(TrapError::MissingTrapOid)?;

        if self.rfc.can_handle(&trap_oid) {
            return self.rfc.parse(varbinds, device);
        }

        let mut event = self.base_event(device, &trap_oid);

        let serial_number = varbind_str(varbinds, ONU_SN_OID).map(|s| s.trim_start_matches("SN ").to_string());
        let status = varbind_str(varbinds, ONU_STATUS_OID).map(|raw| match raw.as_str() {
            "113001" => "ONU_UP".to_string(),
            "113002" => "ONU_DOWN".to_string(),
            _ => "unknown".to_string(),
        });

        if let Some(sn) = &serial_number {
            event.data.insert("onu_serial_number".into(), sn.clone());
        }
        if let Some(status) = &status {
            event.data.insert("onu_status".into(), status.clone());
        }

        if oid_has_prefix(&trap_oid, ONU_STATE_CHANGE_OID) {
            event.event_type = "onu_state_change".into();
            event.message = "ONU configuration state changed".into();
        } else {
            event.event_type = "think_generic_trap".into();
            event.message = "generic Think OLT trap received".into();
        }

        Ok(event)
    }
}
