//! Midnight average roll-up: once a day, every active device's "today"
//! usage series is averaged into its monthly series and cleared.
//!
//! Grounded on `cpuAverageCalculatorScheduler.go`'s `AverageCpuScheduler`
//! and `utils/GetNextMidnight.go` (`time.Date(now.Year(), now.Month(),
//! now.Day()+1, 0, 0, 0, 0, now.Location())` - next local midnight,
//! re-armed every iteration rather than a fixed 24h ticker, so a clock
//! adjustment or DST change never lets the job drift off midnight).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, TimeZone};
use log::warn;
use tokio::sync::watch;

use crate::scheduler::Scheduler;
use crate::storage::DeviceRepository;

pub struct AverageRollupScheduler {
    series: String,
    devices: Arc<DeviceRepository>,
}

impl AverageRollupScheduler {
    pub fn new(series: impl Into<String>, devices: Arc<DeviceRepository>) -> Self {
        AverageRollupScheduler { series: series.into(), devices }
    }

    async fn roll_all(&self) {
        let devices = match self.devices.find_active().await {
            Ok(devices) => devices,
            Err(err) => {
                warn!("average roll-up '{}' failed to list active devices: {err}", self.series);
                return;
            }
        };

        for device in devices {
            if let Err(err) = self.devices.roll_month_average(&device, &self.series).await {
                warn!("average roll-up '{}' failed for {}: {err}", self.series, device.name);
            }
        }
    }
}

/// Duration until the next local midnight, matching `GetNextMidnight`.
fn duration_until_next_midnight() -> std::time::Duration {
    let now = Local::now();
    let next_midnight = (now.date_naive() + ChronoDuration::days(1)).and_hms_opt(0, 0, 0).expect("valid midnight time");
    let next_midnight = Local.from_local_datetime(&next_midnight).single().unwrap_or(now);
    (next_midnight - now).to_std().unwrap_or(std::time::Duration::from_secs(86400))
}

#[cfg(test)]
mod tests {
    use super::duration_until_next_midnight;

    #[test]
    fn is_always_positive_and_bounded_by_a_day() {
        let wait = duration_until_next_midnight();
        assert!(wait.as_secs() > 0);
        assert!(wait.as_secs() <= 86_400);
    }
}

#[async_trait]
impl Scheduler for AverageRollupScheduler {
    fn name(&self) -> &str {
        &self.series
    }

    async fn run(self: Arc<Self>, mut stop_rx: watch::Receiver<bool>) {
        loop {
            let wait = duration_until_next_midnight();
            tokio::select! {
                _ = tokio::time::sleep(wait) => self.roll_all().await,
                _ = stop_rx.changed() => return,
            }
        }
    }
}
