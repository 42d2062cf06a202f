//! Mikrotik enterprise trap handler: link state, high CPU/memory, disk full,
//! and license expiry, falling back to the RFC handler for standard traps.
//!
//! Grounded on `original_source/snmp/trap/handlers/mikrotikHandler.go`.

use chrono::Utc;

use crate::device::{Device, Vendor};
use crate::error::TrapError;
use crate::snmp::ber::VarBind;
use crate::snmp::trap::{extract_trap_oid, oid_has_prefix, varbind_str, TrapEvent, TrapHandler};

use super::rfc::RfcTrapHandler;

const BASE_OID: &str = "1.3.6.1.4.1.14988";
const LINK_UP: &str = "1.3.6.1.4.1.14988.1.1.1.2.1";
const LINK_DOWN: &str = "1.3.6.1.4.1.14988.1.1.1.2.2";
const HIGH_CPU: &str = "1.3.6.1.4.1.14988.1.1.3.1";
const HIGH_MEMORY: &str = "1.3.6.1.4.1.14988.1.1.3.2";
const DISK_FULL: &str = "1.3.6.1.4.1.14988.1.1.3.3";
const LICENSE_EXPIRE: &str = "1.3.6.1.4.1.14988.1.1.3.4";

const HIGH_CPU_VALUE: &str = "1.3.6.1.4.1.14988.1.1.3.1.1";
const HIGH_MEMORY_VALUE: &str = "1.3.6.1.4.1.14988.1.1.3.2.1";
const DISK_FULL_VALUE: &str = "1.3.6.1.4.1.14988.1.1.3.3.1";
const LICENSE_EXPIRE_VALUE: &str = "1.3.6.1.4.1.14988.1.1.3.4.1";
const INTERFACE_NAME: &str = "1.3.6.1.4.1.14988.1.1.1.2.1.1";
const INTERFACE_SPEED: &str = "1.3.6.1.4.1.14988.1.1.1.2.1.2";

pub struct MikrotikTrapHandler {
    rfc: RfcTrapHandler,
}

impl MikrotikTrapHandler {
    pub fn new() -> Self {
        MikrotikTrapHandler { rfc: RfcTrapHandler::new() }
    }

    fn base_event(&self, device: &Device, trap_oid: &str) -> TrapEvent {
        TrapEvent {
            device_id: device.id.map(|o| o.to_hex()).unwrap_or_default(),
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

    fn extract_interface_data(&self, varbinds: &[VarBind], event: &mut TrapEvent) {
        if let Some(v) = varbind_str(varbinds, INTERFACE_NAME) {
            event.data.insert("interface_name".into(), v);
        }
        if let Some(v) = varbind_str(varbinds, INTERFACE_SPEED) {
            event.data.insert("interface_speed".into(), v);
        }
    }
}

impl Default for MikrotikTrapHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TrapHandler for MikrotikTrapHandler {
    fn vendor(&self) -> Vendor {
        Vendor::Mikrotik
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
        match trap_oid.as_str() {
            oid if oid == LINK_UP => {
                event.event_type = "mikrotik_link_up".into();
                event.severity = "info".into();
                event.message = "Mikrotik interface UP".into();
                self.extract_interface_data(varbinds, &mut event);
            }
            oid if oid == LINK_DOWN => {
                event.event_type = "mikrotik_link_down".into();
                event.severity = "warning".into();
                event.message = "Mikrotik interface DOWN".into();
                self.extract_interface_data(varbinds, &mut event);
            }
            oid if oid == HIGH_CPU => {
                event.event_type = "high_cpu".into();
                event.severity = "warning".into();
                event.message = "Mikrotik high CPU usage detected".into();
                if let Some(v) = varbind_str(varbinds, HIGH_CPU_VALUE) {
                    event.message = format!("High CPU usage: {v}%");
                    event.data.insert("cpu_usage".into(), v);
                }
            }
            oid if oid == HIGH_MEMORY => {
                event.event_type = "high_memory".into();
                event.severity = "warning".into();
                event.message = "Mikrotik high memory usage detected".into();
                if let Some(v) = varbind_str(varbinds, HIGH_MEMORY_VALUE) {
                    event.message = format!("High memory usage: {v}%");
                    event.data.insert("memory_usage".into(), v);
                }
            }
            oid if oid == DISK_FULL => {
                event.event_type = "disk_full".into();
                event.severity = "critical".into();
                event.message = "Mikrotik disk full".into();
                if let Some(v) = varbind_str(varbinds, DISK_FULL_VALUE) {
                    event.message = format!("Disk full: {v}%");
                    event.data.insert("disk_usage".into(), v);
                }
            }
            oid if oid == LICENSE_EXPIRE => {
                event.event_type = "license_expire".into();
                event.severity = "warning".into();
                event.message = "License nearing expiration".into();
                if let Some(v) = varbind_str(varbinds, LICENSE_EXPIRE_VALUE) {
                    event.message = format!("License expires in {v} days");
                    event.data.insert("days_to_expire".into(), v);
                }
            }
            _ => return Err(TrapError::Unhandled(trap_oid)),
        }

        Ok(event)
    }
}
