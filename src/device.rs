//! Device model and the cross-cutting `NetworkDevice` capability used by the
//! polling engine, trap demultiplexer, and storage layer alike.
//!
//! Grounded on `original_source/models/router.go` and the `RouterAdapter` /
//! `OLTAdapter` / `SwitchAdapter` wrappers in `original_source/services/snmpService.go`:
//! the original models a router/OLT/switch trio behind one interface. Rust
//! expresses that as a single `Device` struct plus a `DeviceKind` tag rather
//! than three near-identical structs wrapped in three adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vendor/integration tag. `Other` is the Rust-idiomatic answer to the
/// original's untyped `Integration string` field: known vendors get their own
/// collector/trap-handler dispatch, anything else still round-trips losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vendor {
    Mikrotik,
    Think,
    Cisco,
    Juniper,
    TplinkP7000,
    Other(String),
}

impl Vendor {
    pub fn as_str(&self) -> &str {
        match self {
            Vendor::Mikrotik => "mikrotik",
            Vendor::Think => "think",
            Vendor::Cisco => "cisco",
            Vendor::Juniper => "juniper",
            Vendor::TplinkP7000 => "tplinkp7000",
            Vendor::Other(s) => s.as_str(),
        }
    }
}

impl Serialize for Vendor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Vendor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Vendor::from(s.as_str()))
    }
}

impl From<&str> for Vendor {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "mikrotik" => Vendor::Mikrotik,
            "think" => Vendor::Think,
            "cisco" => Vendor::Cisco,
            "juniper" => Vendor::Juniper,
            "tplinkp7000" => Vendor::TplinkP7000,
            other => Vendor::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Router,
    Olt,
    Switch,
}

/// One point in a rolling usage series (5-minute buckets, kept "today" and
/// rolled into a monthly average at local midnight). See
/// `polling::scheduler` for the roll-up job and `storage::device_repo` for the
/// `$push`/`$set` update shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<bson::oid::ObjectId>,
    pub kind: DeviceKind,
    pub active: bool,
    pub vendor: Vendor,
    pub name: String,
    pub description: String,
    pub access_user: String,
    pub access_password: String,
    pub ip_address: String,
    pub snmp_community: String,
    pub snmp_port: u16,

    #[serde(default)]
    pub memory_usage_today: Vec<UsageSample>,
    #[serde(default)]
    pub month_average_memory_usage: Vec<UsageSample>,
    #[serde(default)]
    pub cpu_usage_today: Vec<UsageSample>,
    #[serde(default)]
    pub month_average_cpu_usage: Vec<UsageSample>,
    #[serde(default)]
    pub disk_usage_today: Vec<UsageSample>,
    #[serde(default)]
    pub month_average_disk_usage: Vec<UsageSample>,
    #[serde(default)]
    pub temperature_today: Vec<UsageSample>,
    #[serde(default)]
    pub month_average_temperature: Vec<UsageSample>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    pub fn today_series(&self, metric: &str) -> Option<&[UsageSample]> {
        match metric {
            "memory" => Some(&self.memory_usage_today),
            "cpu" => Some(&self.cpu_usage_today),
            "disk" => Some(&self.disk_usage_today),
            "temperature" => Some(&self.temperature_today),
            _ => None,
        }
    }
}

/// Capability shared by every device kind the polling/trap layers talk to.
/// Replaces the original's `NetworkDevice` interface + per-kind adapters: one
/// impl on `Device` covers router, OLT, and switch since they carry the same
/// fields, distinguished by `DeviceKind`.
pub trait NetworkDevice {
    fn device_id(&self) -> String;
    fn device_kind(&self) -> DeviceKind;
    fn vendor(&self) -> &Vendor;
    fn ip_address(&self) -> &str;
    fn snmp_community(&self) -> &str;
    fn snmp_port(&self) -> u16;
}

impl NetworkDevice for Device {
    fn device_id(&self) -> String {
        self.id.map(|o| o.to_hex()).unwrap_or_default()
    }

    fn device_kind(&self) -> DeviceKind {
        self.kind
    }

    fn vendor(&self) -> &Vendor {
        &self.vendor
    }

    fn ip_address(&self) -> &str {
        &self.ip_address
    }

    fn snmp_community(&self) -> &str {
        &self.snmp_community
    }

    fn snmp_port(&self) -> u16 {
        self.snmp_port
    }
}
