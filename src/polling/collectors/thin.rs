//! Think and TP-Link P7000 collectors: both originals only ever implemented
//! system uptime as a generic metric, everything else in their
//! `GetMetricMapping` table has no backing collection logic - ported
//! faithfully rather than filled in. TP-Link P7000 is the one exception:
//! `tplinkp7000snmpcollectors/temperature.go` exists and is ported here.
//!
//! Grounded on `original_source/snmp/thinkOlt/thinkOltCollector.go` and
//! `original_source/snmp/tplinkp7000/tplinkp7000snmpcollectors/temperature.go`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;

use crate::device::{Device, NetworkDevice, Vendor};
use crate::error::CollectorError;
use crate::polling::collector::{Collector, MetricSpec, MetricValue};
use crate::snmp::SnmpClient;

const OID_SYS_UPTIME: &str = "1.3.6.1.2.1.1.3.0";
const OID_TPLINK_TEMPERATURE: &str = "1.3.6.1.4.1.11863.6.4.1.3.1.1.2.1";

pub struct ThinCollector {
    vendor: Vendor,
}

impl ThinCollector {
    pub fn think() -> Self {
        ThinCollector { vendor: Vendor::Think }
    }

    pub fn tplinkp7000() -> Self {
        ThinCollector { vendor: Vendor::TplinkP7000 }
    }

    fn client(&self, device: &Device) -> Result<SnmpClient, CollectorError> {
        let target: SocketAddr = format!("{}:{}", device.ip_address(), device.snmp_port())
            .parse()
            .map_err(|_| CollectorError::InvalidTarget(device.ip_address().to_string()))?;
        Ok(SnmpClient::new(target, device.snmp_community()))
    }
}

#[async_trait]
impl Collector for ThinCollector {
    fn vendor(&self) -> Vendor {
        self.vendor.clone()
    }

    fn supported_metrics(&self) -> Vec<String> {
        let mut metrics = vec!["uptime".to_string()];
        if self.vendor == Vendor::TplinkP7000 {
            metrics.push("temperature".to_string());
        }
        metrics
    }

    fn metric_mapping(&self) -> HashMap<String, MetricSpec> {
        let mut specs = HashMap::new();
        // `think` has its own entry in `metric_mappings.go`'s
        // `VendorMetricMappings`; `tplinkp7000` has none, so it falls through
        // to `DefaultMetricMappings`' uptime entry (60s, optional) per
        // `GetMetricMapping`'s vendor-map-else-default resolution.
        let uptime = if self.vendor == Vendor::Think {
            MetricSpec {
                name: "uptime".into(),
                interval: Duration::from_secs(10),
                data_key: "system_uptime".into(),
                fallback_keys: vec!["system_uptime".into()],
                required: true,
            }
        } else {
            MetricSpec {
                name: "uptime".into(),
                interval: Duration::from_secs(60),
                data_key: "system_uptime".into(),
                fallback_keys: vec!["uptime".into(), "system_uptime".into()],
                required: false,
            }
        };
        specs.insert("uptime".to_string(), uptime);

        if self.vendor == Vendor::TplinkP7000 {
            specs.insert(
                "temperature".to_string(),
                MetricSpec {
                    name: "temperature".into(),
                    interval: Duration::from_secs(30),
                    data_key: "temperature_celsius".into(),
                    fallback_keys: vec![],
                    required: false,
                },
            );
        }
        specs
    }

    async fn collect(&self, device: &Device) -> Result<HashMap<String, MetricValue>, CollectorError> {
        let client = self.client(device)?;
        let mut data = HashMap::new();
        if let Ok(v) = client.get_u64(OID_SYS_UPTIME).await {
            data.insert("system_uptime".into(), MetricValue::Integer(v as i64));
        }
        if self.vendor == Vendor::TplinkP7000 {
            if let Ok(raw) = client.get_string(OID_TPLINK_TEMPERATURE).await {
                if let Ok(celsius) = parse_tplink_temperature(&raw) {
                    data.insert("temperature_celsius".into(), MetricValue::Float(celsius));
                }
            }
        }
        Ok(data)
    }

    async fn collect_metric(&self, device: &Device, metric: &str) -> Result<Option<MetricValue>, CollectorError> {
        let client = self.client(device)?;
        match metric {
            "uptime" => {
                let v = client
                    .get_u64(OID_SYS_UPTIME)
                    .await
                    .map_err(|source| CollectorError::Transport { target: device.ip_address.clone(), source })?;
                Ok(Some(MetricValue::Integer(v as i64)))
            }
            "temperature" if self.vendor == Vendor::TplinkP7000 => {
                let raw = client
                    .get_string(OID_TPLINK_TEMPERATURE)
                    .await
                    .map_err(|source| CollectorError::Transport { target: device.ip_address.clone(), source })?;
                match parse_tplink_temperature(&raw) {
                    Ok(celsius) => Ok(Some(MetricValue::Float(celsius))),
                    Err(()) => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }
}

/// Strips whitespace/line endings the device appends to its temperature
/// string (e.g. `"36.50 C\r\n"`) before parsing, matching
/// `CollectTpLinkP7000Temperature`'s `strings.ReplaceAll` cleanup. The
/// original swallows a parse failure into a zero-value metric; here it
/// becomes `Err` so the caller can skip the sample instead of reporting 0.
fn parse_tplink_temperature(raw: &str) -> Result<f64, ()> {
    raw.replace(' ', "").replace("\r\n", "").replace('C', "").trim().parse::<f64>().map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::parse_tplink_temperature;

    #[test]
    fn parses_device_formatted_reading() {
        assert_eq!(parse_tplink_temperature("36.50 C\r\n"), Ok(36.5));
    }

    #[test]
    fn parses_bare_number() {
        assert_eq!(parse_tplink_temperature("42"), Ok(42.0));
    }

    #[test]
    fn garbage_reading_fails_rather_than_reporting_zero() {
        assert_eq!(parse_tplink_temperature("N/A"), Err(()));
    }
}
