use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Kind of data a record provider can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    HeartRate,
    SleepSession,
}

impl RecordType {
    pub const ALL: [RecordType; 2] = [RecordType::HeartRate, RecordType::SleepSession];

    /// Read capability that must already be granted for this record type.
    pub fn permission(self) -> &'static str {
        match self {
            RecordType::HeartRate => "READ_HEART_RATE",
            RecordType::SleepSession => "READ_SLEEP",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::HeartRate => "heart_rate",
            RecordType::SleepSession => "sleep_session",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn required_permissions() -> Vec<&'static str> {
    RecordType::ALL.iter().map(|r| r.permission()).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub time: DateTime<Utc>,
    pub bpm: i32,
}

/// Provider batch covering `[start, end]` with any number of samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeartRateRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub samples: Vec<HeartRateSample>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SleepStageKind {
    Deep,
    Light,
    Rem,
    Awake,
    Unknown,
}

impl SleepStageKind {
    /// Classifies a provider stage name, case-insensitively, by substring.
    /// `DEEP` is checked first, then `REM`, `AWAKE` and `LIGHT`.
    pub fn classify(name: &str) -> Self {
        let name = name.to_uppercase();
        if name.contains("DEEP") {
            SleepStageKind::Deep
        } else if name.contains("REM") {
            SleepStageKind::Rem
        } else if name.contains("AWAKE") {
            SleepStageKind::Awake
        } else if name.contains("LIGHT") {
            SleepStageKind::Light
        } else {
            SleepStageKind::Unknown
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SleepStage {
    /// Provider stage name, e.g. `STAGE_TYPE_DEEP` or `rem`.
    pub stage: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SleepStage {
    pub fn kind(&self) -> SleepStageKind {
        SleepStageKind::classify(&self.stage)
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SleepSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub stages: Vec<SleepStage>,
}

impl SleepSession {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn has_stages(&self) -> bool {
        !self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(SleepStageKind::classify("STAGE_TYPE_DEEP"), SleepStageKind::Deep);
        assert_eq!(SleepStageKind::classify("deep"), SleepStageKind::Deep);
        assert_eq!(SleepStageKind::classify("Rem"), SleepStageKind::Rem);
        assert_eq!(SleepStageKind::classify("awake_in_bed"), SleepStageKind::Awake);
        assert_eq!(SleepStageKind::classify("light"), SleepStageKind::Light);
    }

    #[test]
    fn classify_unrecognised_names() {
        assert_eq!(SleepStageKind::classify("OUT_OF_BED"), SleepStageKind::Unknown);
        assert_eq!(SleepStageKind::classify(""), SleepStageKind::Unknown);
    }

    #[test]
    fn permissions_cover_every_record_type() {
        assert_eq!(required_permissions(), vec!["READ_HEART_RATE", "READ_SLEEP"]);
        assert_eq!(RecordType::SleepSession.to_string(), "sleep_session");
    }

    #[test]
    fn session_without_stages_deserializes() {
        let session: SleepSession = serde_json::from_str(
            r#"{"start":"2025-01-01T22:00:00Z","end":"2025-01-02T06:00:00Z"}"#,
        )
        .unwrap();

        assert!(!session.has_stages());
        assert_eq!(session.duration(), TimeDelta::hours(8));
    }
}
