use chrono::{DateTime, TimeDelta, Utc};
use vitalsync_types::{SyncMode, SyncWindow};

/// Lookback used the first time a checkpointed sync runs.
pub const FIRST_SYNC_LOOKBACK: TimeDelta = TimeDelta::days(7);

pub fn resolve_window(mode: SyncMode, checkpoint_millis: i64, now: DateTime<Utc>) -> SyncWindow {
    let start = match mode {
        SyncMode::ExplicitHours(hours) => TimeDelta::try_hours(i64::from(hours))
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
        SyncMode::SinceCheckpoint => checkpoint_instant(checkpoint_millis)
            .unwrap_or_else(|| now - FIRST_SYNC_LOOKBACK),
    };

    SyncWindow { start, end: now }
}

fn checkpoint_instant(millis: i64) -> Option<DateTime<Utc>> {
    if millis <= 0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn explicit_hours_looks_back_from_now() {
        let window = resolve_window(SyncMode::ExplicitHours(24), 0, now());
        assert_eq!(window.end, now());
        assert_eq!(window.duration(), TimeDelta::hours(24));
    }

    #[test]
    fn explicit_hours_ignores_checkpoint() {
        let checkpoint = (now() - TimeDelta::hours(1)).timestamp_millis();
        let window = resolve_window(SyncMode::ExplicitHours(6), checkpoint, now());
        assert_eq!(window.start, now() - TimeDelta::hours(6));
    }

    #[test]
    fn huge_lookback_saturates_at_earliest_instant() {
        let window = resolve_window(SyncMode::ExplicitHours(u32::MAX), 0, now());
        assert_eq!(window.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(window.end, now());
    }

    #[test]
    fn since_checkpoint_starts_at_checkpoint() {
        let checkpoint = Utc.with_ymd_and_hms(2025, 3, 9, 21, 30, 0).unwrap();
        let window = resolve_window(
            SyncMode::SinceCheckpoint,
            checkpoint.timestamp_millis(),
            now(),
        );
        assert_eq!(window.start, checkpoint);
        assert_eq!(window.end, now());
    }

    #[test]
    fn first_sync_looks_back_seven_days() {
        let window = resolve_window(SyncMode::SinceCheckpoint, 0, now());
        assert_eq!(window.start, now() - TimeDelta::days(7));
    }

    #[test]
    fn unrepresentable_checkpoint_counts_as_never_synced() {
        let window = resolve_window(SyncMode::SinceCheckpoint, i64::MAX, now());
        assert_eq!(window.start, now() - FIRST_SYNC_LOOKBACK);
    }
}
