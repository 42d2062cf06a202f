//! Device persistence and the rolling usage-series update used by both the
//! polling engine's collectors and the midnight roll-up scheduler.
//!
//! Grounded on `original_source/models/router.go`'s `Roteador` and the
//! repository lookups `original_source/netflow/worker.go` performs
//! (`routerRepo.GetByFilter(bson.M{"ipAddress": ...})`).

use bson::{doc, Document};
use chrono::Utc;

use crate::device::{Device, UsageSample};
use crate::error::StorageError;
use crate::storage::repository::Repository;

#[derive(Clone)]
pub struct DeviceRepository {
    inner: Repository<Device>,
}

impl DeviceRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        DeviceRepository {
            inner: Repository::new(db, "devices"),
        }
    }

    pub async fn find_by_ip(&self, ip_address: &str) -> Result<Option<Device>, StorageError> {
        self.inner.find_one(doc! { "ipAddress": ip_address }).await
    }

    pub async fn find_by_id(&self, id: &bson::oid::ObjectId) -> Result<Option<Device>, StorageError> {
        self.inner.find_one(doc! { "_id": id }).await
    }

    pub async fn find_active(&self) -> Result<Vec<Device>, StorageError> {
        self.inner.find(doc! { "active": true }).await
    }

    /// Appends one sample to today's rolling series for `metric`, matching
    /// the `$push` used for `*UsageToday` arrays in the original.
    pub async fn push_usage_sample(
        &self,
        device_id: &bson::oid::ObjectId,
        metric: &str,
        value: f64,
    ) -> Result<(), StorageError> {
        let field = today_field(metric);
        let sample = UsageSample {
            timestamp: Utc::now(),
            value,
        };
        let update = doc! {
            "$push": { field: bson::to_bson(&sample).map_err(StorageError::Serialize)? },
            "$set": { "updatedAt": Utc::now() },
        };
        self.inner
            .update_by_filter(doc! { "_id": device_id }, update, false)
            .await?;
        Ok(())
    }

    /// Rolls today's series into the month-average series and clears today's,
    /// run once at local midnight per device/metric by the scheduler.
    pub async fn roll_month_average(
        &self,
        device: &Device,
        metric: &str,
    ) -> Result<(), StorageError> {
        let today = device.today_series(metric).unwrap_or(&[]);
        if today.is_empty() {
            return Ok(());
        }
        let average = today.iter().map(|s| s.value).sum::<f64>() / today.len() as f64;
        let sample = UsageSample {
            timestamp: Utc::now(),
            value: average,
        };
        let month_field = month_average_field(metric);
        let today_field_name = today_field(metric);
        let update: Document = doc! {
            "$push": { month_field: bson::to_bson(&sample).map_err(StorageError::Serialize)? },
            "$set": { today_field_name: [], "updatedAt": Utc::now() },
        };
        self.inner
            .update_by_filter(doc! { "_id": device.id }, update, false)
            .await?;
        Ok(())
    }
}

fn today_field(metric: &str) -> &'static str {
    match metric {
        "memory" => "memoryUsageToday",
        "cpu" => "cpuUsageToday",
        "disk" => "diskUsageToday",
        "temperature" => "temperatureToday",
        _ => "unknownUsageToday",
    }
}

fn month_average_field(metric: &str) -> &'static str {
    match metric {
        "memory" => "monthAverageMemoryUsage",
        "cpu" => "monthAverageCpuUsage",
        "disk" => "monthAverageDiskUsage",
        "temperature" => "monthAverageTemperature",
        _ => "unknownMonthAverageUsage",
    }
}
