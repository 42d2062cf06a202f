pub mod mikrotik;
pub mod rfc;
pub mod think_olt;
pub mod tplinkp7000;

use crate::snmp::trap::TrapHandler;

/// Registered in demultiplex order: `CanHandle` is tried on each in turn
/// until one claims the trap OID. Vendor handlers fall back to the RFC
/// handler internally for standard traps, but a registry entry is still kept
/// for it so an unregistered-vendor device's standard traps still resolve.
pub fn default_registry() -> Vec<Box<dyn TrapHandler>> {
    vec![
        Box::new(mikrotik::MikrotikTrapHandler::new()),
        Box::new(think_olt::ThinkOltTrapHandler::new()),
        Box::new(tplinkp7000::TplinkP7000TrapHandler::new()),
        Box::new(rfc::RfcTrapHandler::new()),
    ]
}
