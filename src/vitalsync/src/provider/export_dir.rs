use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use vitalsync_types::{HeartRateRecord, RecordType, SleepSession, SyncWindow};

use crate::{ProviderError, RecordProvider};

const HEART_RATE_FILE: &str = "heart_rate.json";
const SLEEP_SESSIONS_FILE: &str = "sleep_sessions.json";

/// Reads records from a directory of JSON exports.
///
/// `heart_rate.json` holds an array of heart rate records and
/// `sleep_sessions.json` an array of sleep sessions. A missing file means no
/// data of that type; a missing directory means the provider is unavailable.
#[derive(Clone, Debug)]
pub struct ExportDirProvider {
    root: PathBuf,
}

impl ExportDirProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_records<T>(&self, record_type: RecordType) -> Result<Vec<T>, ProviderError>
    where
        T: DeserializeOwned + Send,
    {
        let path = self.root.join(file_name(record_type));
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No {} export at {}", record_type, path.display());
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(ProviderError::PermissionDenied(record_type));
            }
            Err(e) => return Err(ProviderError::read(record_type, e)),
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::read(record_type, format!("{}: {e}", path.display())))
    }
}

fn file_name(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::HeartRate => HEART_RATE_FILE,
        RecordType::SleepSession => SLEEP_SESSIONS_FILE,
    }
}

fn overlaps(window: &SyncWindow, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start < window.end && end >= window.start
}

impl RecordProvider for ExportDirProvider {
    async fn is_available(&self) -> bool {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                warn!("Export directory {} unreadable: {e}", self.root.display());
                false
            }
        }
    }

    async fn fetch_heart_rate(
        &self,
        window: SyncWindow,
    ) -> Result<Vec<HeartRateRecord>, ProviderError> {
        let records: Vec<HeartRateRecord> = self.read_records(RecordType::HeartRate).await?;
        Ok(records
            .into_iter()
            .filter(|r| overlaps(&window, r.start, r.end))
            .collect())
    }

    async fn fetch_sleep_sessions(
        &self,
        window: SyncWindow,
    ) -> Result<Vec<SleepSession>, ProviderError> {
        let sessions: Vec<SleepSession> = self.read_records(RecordType::SleepSession).await?;
        Ok(sessions
            .into_iter()
            .filter(|s| overlaps(&window, s.start, s.end))
            .collect())
    }
}
