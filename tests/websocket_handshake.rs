//! Scenario S6: WebSocket handshake resolution and its error paths.

use flow_telemetry::auth::StaticTokenAuth;
use flow_telemetry::error::HandshakeError;
use flow_telemetry::hub::{ClientHandshake, EventHub};

#[test]
fn missing_device_id_is_rejected() {
    let auth = StaticTokenAuth::new("secret");
    let err = ClientHandshake::from_query(None, None, None, None, Some("mikrotik"), Some("secret"), &auth).unwrap_err();
    assert!(matches!(err, HandshakeError::MissingDeviceId));
}

#[test]
fn missing_vendor_is_rejected() {
    let auth = StaticTokenAuth::new("secret");
    let err = ClientHandshake::from_query(Some("dev1"), None, None, None, None, Some("secret"), &auth).unwrap_err();
    assert!(matches!(err, HandshakeError::MissingVendor));
}

#[test]
fn bad_token_is_unauthorized() {
    let auth = StaticTokenAuth::new("secret");
    let err = ClientHandshake::from_query(Some("dev1"), None, None, None, Some("mikrotik"), Some("wrong"), &auth).unwrap_err();
    assert!(matches!(err, HandshakeError::Unauthorized));
}

#[test]
fn missing_token_is_unauthorized() {
    let auth = StaticTokenAuth::new("secret");
    let err = ClientHandshake::from_query(Some("dev1"), None, None, None, Some("mikrotik"), None, &auth).unwrap_err();
    assert!(matches!(err, HandshakeError::Unauthorized));
}

#[test]
fn router_id_olt_id_switch_id_are_aliases_for_device_id() {
    let auth = StaticTokenAuth::new("secret");
    let handshake = ClientHandshake::from_query(None, Some("router9"), None, None, Some("cisco"), Some("secret"), &auth).unwrap();
    assert_eq!(handshake.device_id, "router9");
    assert_eq!(handshake.vendor, "cisco");

    let handshake = ClientHandshake::from_query(None, None, Some("olt3"), None, Some("think"), Some("secret"), &auth).unwrap();
    assert_eq!(handshake.device_id, "olt3");

    let handshake = ClientHandshake::from_query(None, None, None, Some("sw1"), Some("juniper"), Some("secret"), &auth).unwrap();
    assert_eq!(handshake.device_id, "sw1");
}

#[test]
fn device_id_takes_precedence_over_aliases() {
    let auth = StaticTokenAuth::new("secret");
    let handshake = ClientHandshake::from_query(Some("primary"), Some("router9"), None, None, Some("cisco"), Some("secret"), &auth).unwrap();
    assert_eq!(handshake.device_id, "primary");
}

#[tokio::test]
async fn new_hub_has_no_connected_clients() {
    let hub = EventHub::new();
    assert_eq!(hub.client_count().await, 0);
}
