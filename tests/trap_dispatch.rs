//! Property 9 and scenario S4: vendor trap handler dispatch and fallback to
//! the RFC handler for standard traps.

use chrono::Utc;
use flow_telemetry::device::{Device, DeviceKind, Vendor};
use flow_telemetry::snmp::ber::Value;
use flow_telemetry::snmp::handlers::mikrotik::MikrotikTrapHandler;
use flow_telemetry::snmp::handlers::rfc::RfcTrapHandler;
use flow_telemetry::snmp::trap::{TrapHandler, OID_COLD_START, OID_LINK_DOWN, OID_SNMP_TRAP_OID};

fn test_device(vendor: Vendor) -> Device {
    Device {
        id: None,
        kind: DeviceKind::Router,
        active: true,
        vendor,
        name: "dev1".into(),
        description: String::new(),
        access_user: String::new(),
        access_password: String::new(),
        ip_address: "10.0.0.1".into(),
        snmp_community: "public".into(),
        snmp_port: 161,
        memory_usage_today: vec![],
        month_average_memory_usage: vec![],
        cpu_usage_today: vec![],
        month_average_cpu_usage: vec![],
        disk_usage_today: vec![],
        month_average_disk_usage: vec![],
        temperature_today: vec![],
        month_average_temperature: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn rfc_handler_parses_cold_start() {
    let handler = RfcTrapHandler::new();
    let varbinds = vec![(OID_SNMP_TRAP_OID.to_string(), Value::Oid(OID_COLD_START.to_string()))];
    let device = test_device(Vendor::Other("rfc".into()));

    assert!(handler.can_handle(OID_COLD_START));
    let event = handler.parse(&varbinds, &device).unwrap();
    assert_eq!(event.event_type, "cold_start");
    assert_eq!(event.severity, "critical");
}

#[test]
fn rfc_handler_rejects_unknown_oid() {
    let handler = RfcTrapHandler::new();
    let varbinds = vec![(OID_SNMP_TRAP_OID.to_string(), Value::Oid("1.2.3.4".to_string()))];
    let device = test_device(Vendor::Other("rfc".into()));

    assert!(!handler.can_handle("1.2.3.4"));
    assert!(handler.parse(&varbinds, &device).is_err());
}

#[test]
fn mikrotik_handler_parses_its_own_enterprise_trap() {
    let handler = MikrotikTrapHandler::new();
    let high_cpu_oid = "1.3.6.1.4.1.14988.1.1.3.1";
    let varbinds = vec![
        (OID_SNMP_TRAP_OID.to_string(), Value::Oid(high_cpu_oid.to_string())),
        ("1.3.6.1.4.1.14988.1.1.3.1.1".to_string(), Value::OctetString(b"97".to_vec())),
    ];
    let device = test_device(Vendor::Mikrotik);

    assert!(handler.can_handle(high_cpu_oid));
    let event = handler.parse(&varbinds, &device).unwrap();
    assert_eq!(event.event_type, "high_cpu");
    assert_eq!(event.data.get("cpu_usage"), Some(&"97".to_string()));
    assert!(event.message.contains("97%"));
}

/// Scenario S4: a Mikrotik device emitting a standard RFC 3418 trap (link
/// down) falls through to the wrapped RFC handler rather than being
/// rejected as unrecognized.
#[test]
fn mikrotik_handler_falls_back_to_rfc_for_standard_traps() {
    let handler = MikrotikTrapHandler::new();
    let varbinds = vec![(OID_SNMP_TRAP_OID.to_string(), Value::Oid(OID_LINK_DOWN.to_string()))];
    let device = test_device(Vendor::Mikrotik);

    assert!(handler.can_handle(OID_LINK_DOWN));
    let event = handler.parse(&varbinds, &device).unwrap();
    assert_eq!(event.event_type, "link_down");
    assert_eq!(event.severity, "warning");
}

#[test]
fn missing_trap_oid_varbind_is_an_error() {
    let handler = RfcTrapHandler::new();
    let device = test_device(Vendor::Other("rfc".into()));
    assert!(handler.parse(&[], &device).is_err());
}
