//! Turns raw provider records into partial biometric points.
//!
//! Both extractors absorb provider failures: the error is logged and the
//! stream yields nothing, so a sync can still complete with the other stream.

use vitalsync_algos::{SleepQualityInput, StageBreakdown};
use vitalsync_types::{BiometricPoint, HeartRateRecord, SleepSession, SyncWindow};

use crate::RecordProvider;

pub async fn extract_heart_rate<P>(provider: &P, window: SyncWindow) -> Vec<BiometricPoint>
where
    P: RecordProvider,
{
    match provider.fetch_heart_rate(window).await {
        Ok(records) => {
            let points = heart_rate_points(&records);
            debug!(
                "Read {} heart rate samples from {} records",
                points.len(),
                records.len()
            );
            points
        }
        Err(e) => {
            error!("Failed to read heart rate data: {e}");
            Vec::new()
        }
    }
}

pub async fn extract_sleep<P>(provider: &P, window: SyncWindow) -> Vec<BiometricPoint>
where
    P: RecordProvider,
{
    match provider.fetch_sleep_sessions(window).await {
        Ok(sessions) => {
            let points = sleep_points(&sessions);
            debug!(
                "Scored {} of {} sleep sessions",
                points.len(),
                sessions.len()
            );
            points
        }
        Err(e) => {
            error!("Failed to read sleep data: {e}");
            Vec::new()
        }
    }
}

/// One point per embedded sample; a record is a batch, not a reading.
pub fn heart_rate_points(records: &[HeartRateRecord]) -> Vec<BiometricPoint> {
    records
        .iter()
        .flat_map(|record| record.samples.iter())
        .map(|sample| BiometricPoint::heart_rate(sample.time, sample.bpm))
        .collect()
}

/// One point per session, stamped at the session start.
pub fn sleep_points(sessions: &[SleepSession]) -> Vec<BiometricPoint> {
    sessions.iter().filter_map(score_session).collect()
}

fn score_session(session: &SleepSession) -> Option<BiometricPoint> {
    if session.end < session.start {
        warn!(
            "Skipping sleep session starting {} that ends before it starts",
            session.start
        );
        return None;
    }

    let breakdown = StageBreakdown::from_stages(&session.stages);
    let input = SleepQualityInput::with_breakdown(session, breakdown);
    if session.has_stages() {
        if breakdown.unclassified > 0 {
            debug!(
                "Counted {}min of unrecognised sleep stages as light sleep",
                breakdown.unclassified
            );
        }
        debug!(
            "Sleep session stages - Deep: {}min, Light: {}min, REM: {}min, Awake: {}min",
            input.deep_minutes, input.light_minutes, input.rem_minutes, input.awake_minutes
        );
    }

    Some(BiometricPoint::sleep(
        session.start,
        input.duration_minutes,
        input.score(),
    ))
}
