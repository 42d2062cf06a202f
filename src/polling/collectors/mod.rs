pub mod generic_snmp;
pub mod mikrotik;
pub mod thin;

use std::collections::HashMap;

use crate::device::Vendor;

use super::collector::Collector;

/// Builds the vendor -> collector registry, analogous to the original's
/// `collectors map[string]SNMPCollector` populated at startup.
pub fn default_registry() -> HashMap<Vendor, Box<dyn Collector>> {
    let mut registry: HashMap<Vendor, Box<dyn Collector>> = HashMap::new();
    registry.insert(Vendor::Mikrotik, Box::new(mikrotik::MikrotikCollector::new()));
    registry.insert(Vendor::Think, Box::new(thin::ThinCollector::think()));
    registry.insert(Vendor::TplinkP7000, Box::new(thin::ThinCollector::tplinkp7000()));
    registry.insert(Vendor::Cisco, Box::new(generic_snmp::GenericSnmpCollector::cisco()));
    registry.insert(Vendor::Juniper, Box::new(generic_snmp::GenericSnmpCollector::juniper()));
    registry
}
