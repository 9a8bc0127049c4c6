use std::future::Future;

use vitalsync_types::{HeartRateRecord, SleepSession, SyncWindow};

use crate::ProviderError;

mod export_dir;
pub use export_dir::ExportDirProvider;

mod http;
pub use http::HttpRecordProvider;

/// Read-only source of raw health records.
///
/// Implementations return every record overlapping the window. Read
/// permissions (see [`vitalsync_types::required_permissions`]) are assumed to
/// be granted already; a denied read surfaces as
/// [`ProviderError::PermissionDenied`].
pub trait RecordProvider: Send + Sync {
    /// Whether the data source can be reached at all.
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    fn fetch_heart_rate(
        &self,
        window: SyncWindow,
    ) -> impl Future<Output = Result<Vec<HeartRateRecord>, ProviderError>> + Send;

    fn fetch_sleep_sessions(
        &self,
        window: SyncWindow,
    ) -> impl Future<Output = Result<Vec<SleepSession>, ProviderError>> + Send;
}
