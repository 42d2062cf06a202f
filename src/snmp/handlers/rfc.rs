//! Baseline RFC 3418 trap handler: cold/warm start, link up/down, and
//! authentication failure. Every vendor handler falls back to this one for
//! standard traps before checking its own vendor-specific OID space.
//!
//! Grounded on `original_source/snmp/trap/handlers/rfcHandler.go`.

use chrono::Utc;

use crate::device::{Device, Vendor};
use crate::error::TrapError;
use crate::snmp::ber::VarBind;
use crate::snmp::trap::{
    extract_trap_oid, oid_suffix_matches, varbind_str, TrapEvent, TrapHandler, OID_AUTH_FAILURE,
    OID_COLD_START, OID_IF_ADMIN_STATUS, OID_IF_DESCR, OID_IF_INDEX, OID_IF_OPER_STATUS, OID_LINK_DOWN, OID_LINK_UP,
    OID_WARM_START,
};

pub struct RfcTrapHandler;

const SUPPORTED: [&str; 5] = [OID_COLD_START, OID_WARM_START, OID_LINK_DOWN, OID_LINK_UP, OID_AUTH_FAILURE];

impl RfcTrapHandler {
    pub fn new() -> Self {
        RfcTrapHandler
    }

    fn extract_interface_data(&self, varbinds: &[VarBind], data: &mut std::collections::HashMap<String, String>) {
        if let Some(v) = varbind_str(varbinds, OID_IF_INDEX) {
            data.insert("interface_index".into(), v);
        }
        if let Some(v) = varbind_str(varbinds, OID_IF_DESCR) {
            data.insert("interface_name".into(), v);
        }
        if let Some(v) = varbind_str(varbinds, OID_IF_ADMIN_STATUS) {
            data.insert("admin_status".into(), v);
        }
        if let Some(v) = varbind_str(varbinds, OID_IF_OPER_STATUS) {
            data.insert("oper_status".into(), v);
        }
    }

    fn base_event(&self, device: &Device, trap_oid: &str) -> TrapEvent {
        TrapEvent {
            device_id: device_id(device),
            device_name: device.name.clone(),
            device_ip: device.ip_address.clone(),
            vendor: device.vendor.clone(),
            event_type: String::new(),
            severity: String::new(),
            message: String::new(),
            data: Default::default(),
            trap_oid: trap_oid.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl Default for RfcTrapHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn device_id(device: &Device) -> String {
    device.id.map(|o| o.to_hex()).unwrap_or_default()
}

impl TrapHandler for RfcTrapHandler {
    fn vendor(&self) -> Vendor {
        Vendor::Other("rfc".to_string())
    }

    fn can_handle(&self, trap_oid: &str) -> bool {
        SUPPORTED.iter().any(|oid| oid_suffix_matches(trap_oid, oid))
    }

    fn parse(&self, varbinds: &[VarBind], device: &Device) -> Result<TrapEvent, TrapError> {
        let trap_oid = extract_trap_oid(varbinds).ok_or(TrapError::MissingTrapOid)?;
        let mut event = self.base_event(device, &trap_oid);

        if oid_suffix_matches(&trap_oid, OID_LINK_DOWN) {
            event.event_type = "link_down".into();
            event.severity = "warning".into();
            event.message = "interface link down".into();
            self.extract_interface_data(varbinds, &mut event.data);
        } else if oid_suffix_matches(&trap_oid, OID_LINK_UP) {
            event.event_type = "link_up".into();
            event.severity = "info".into();
            event.message = "interface link up".into();
            self.extract_interface_data(varbinds, &mut event.data);
        } else if oid_suffix_matches(&trap_oid, OID_COLD_START) {
            event.event_type = "cold_start".into();
            event.severity = "critical".into();
            event.message = "device cold start".into();
        } else if oid_suffix_matches(&trap_oid, OID_WARM_START) {
            event.event_type = "warm_start".into();
            event.severity = "warning".into();
            event.message = "device warm start".into();
        } else if oid_suffix_matches(&trap_oid, OID_AUTH_FAILURE) {
            event.event_type = "auth_failure".into();
            event.severity = "critical".into();
            event.message = "SNMP authentication failure".into();
        } else {
            return Err(TrapError::Unhandled(trap_oid));
        }

        Ok(event)
    }
}
