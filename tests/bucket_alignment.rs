//! Property 5: 5-minute bucket alignment.

use chrono::{TimeZone, Utc};
use flow_telemetry::storage::bucket::truncate_to_bucket;

#[test]
fn timestamps_within_the_same_window_share_a_bucket() {
    let a = Utc.with_ymd_and_hms(2026, 7, 26, 14, 20, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2026, 7, 26, 14, 24, 59).unwrap();
    assert_eq!(truncate_to_bucket(a), truncate_to_bucket(b));
}

#[test]
fn next_window_starts_a_new_bucket() {
    let last_of_window = Utc.with_ymd_and_hms(2026, 7, 26, 14, 24, 59).unwrap();
    let first_of_next = Utc.with_ymd_and_hms(2026, 7, 26, 14, 25, 0).unwrap();
    assert_ne!(truncate_to_bucket(last_of_window), truncate_to_bucket(first_of_next));

    let expected = Utc.with_ymd_and_hms(2026, 7, 26, 14, 25, 0).unwrap();
    assert_eq!(truncate_to_bucket(first_of_next), expected);
}

#[test]
fn truncation_zeroes_seconds_and_rounds_minute_down_to_a_multiple_of_five() {
    let now = Utc.with_ymd_and_hms(2026, 7, 26, 9, 47, 33).unwrap();
    let bucket = truncate_to_bucket(now);
    assert_eq!(bucket, Utc.with_ymd_and_hms(2026, 7, 26, 9, 45, 0).unwrap());
}
