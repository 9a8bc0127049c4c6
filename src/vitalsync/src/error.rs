use thiserror::Error;
use vitalsync_types::RecordType;

/// Failure reading one record type from a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("health data provider is not available")]
    Unavailable,
    #[error("permission denied reading {0}")]
    PermissionDenied(RecordType),
    #[error("failed to read {record_type}: {message}")]
    Read {
        record_type: RecordType,
        message: String,
    },
}

impl ProviderError {
    pub fn read(record_type: RecordType, message: impl ToString) -> Self {
        Self::Read {
            record_type,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("health data provider is not available on this device")]
    ProviderUnavailable,
    #[error("a sync is already in progress")]
    AlreadySyncing,
    #[error("unable to read sync checkpoint: {0:#}")]
    Checkpoint(anyhow::Error),
    #[error("unable to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
