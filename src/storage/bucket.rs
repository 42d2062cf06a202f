//! Shared 5-minute bucketing helper for additive metrics.
//!
//! Every bucketed-metric processor (`ip_version`, `dns_quality`, `interface`)
//! follows the same shape found in `original_source/netflow/metrics/ipVersionMetric.go`:
//! truncate the current time to a 5-minute boundary, upsert by
//! `(routerIp, ..., timestamp)` with `$inc` for counters and `$setOnInsert`
//! for identity fields.

use chrono::{DateTime, Duration, Timelike, Utc};

/// Truncates `now` down to the start of its enclosing 5-minute window, the
/// same truncation `time.Truncate(5*time.Minute)` performs in the original.
pub fn truncate_to_bucket(now: DateTime<Utc>) -> DateTime<Utc> {
    let minute = now.minute();
    let floored = minute - (minute % 5);
    now.with_minute(floored)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now - Duration::minutes((minute % 5) as i64))
}
