use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use vitalsync_types::BiometricPoint;

/// Combines heart rate and sleep points into one point per distinct
/// timestamp, ordered by time.
///
/// Only the fields a point carries are written to the entry for its
/// timestamp. The heart rate stream is applied before the sleep stream, so on
/// a collision the later value wins.
pub fn merge_points<H, S>(heart_rate: H, sleep: S) -> Vec<BiometricPoint>
where
    H: IntoIterator<Item = BiometricPoint>,
    S: IntoIterator<Item = BiometricPoint>,
{
    let mut merged: BTreeMap<DateTime<Utc>, BiometricPoint> = BTreeMap::new();

    for point in heart_rate.into_iter().chain(sleep) {
        let entry = merged
            .entry(point.timestamp)
            .or_insert_with(|| BiometricPoint::new(point.timestamp));
        overlay(entry, &point);
    }

    merged.into_values().collect()
}

fn overlay(entry: &mut BiometricPoint, point: &BiometricPoint) {
    if point.heart_rate_bpm.is_some() {
        entry.heart_rate_bpm = point.heart_rate_bpm;
    }
    if point.sleep_minutes.is_some() {
        entry.sleep_minutes = point.sleep_minutes;
    }
    if point.sleep_quality.is_some() {
        entry.sleep_quality = point.sleep_quality;
    }
}
