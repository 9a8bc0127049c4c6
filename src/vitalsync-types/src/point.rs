use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One merged biometric observation. Any subset of the measurement fields
/// may be set; `timestamp` is the identity key.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiometricPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_bpm: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<f64>,
}

impl BiometricPoint {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            heart_rate_bpm: None,
            sleep_minutes: None,
            sleep_quality: None,
        }
    }

    pub fn heart_rate(timestamp: DateTime<Utc>, bpm: i32) -> Self {
        Self {
            heart_rate_bpm: Some(bpm),
            ..Self::new(timestamp)
        }
    }

    pub fn sleep(timestamp: DateTime<Utc>, minutes: i32, quality: f64) -> Self {
        Self {
            sleep_minutes: Some(minutes),
            sleep_quality: Some(quality),
            ..Self::new(timestamp)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heart_rate_bpm.is_none() && self.sleep_minutes.is_none() && self.sleep_quality.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unset_fields_are_omitted() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 22, 0, 0).unwrap();
        let json = serde_json::to_value(BiometricPoint::heart_rate(t, 62)).unwrap();

        assert_eq!(json["heart_rate_bpm"], 62);
        assert!(json.get("sleep_minutes").is_none());
        assert!(json.get("sleep_quality").is_none());
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let point: BiometricPoint =
            serde_json::from_str(r#"{"timestamp":"2025-01-01T22:00:00Z","sleep_minutes":45}"#)
                .unwrap();

        assert_eq!(point.sleep_minutes, Some(45));
        assert!(point.heart_rate_bpm.is_none());
        assert!(!point.is_empty());
        assert!(BiometricPoint::new(point.timestamp).is_empty());
    }
}
