use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use vitalsync_algos::{merge_points, resolve_window};
use vitalsync_types::{BiometricPoint, SyncMode};

use crate::{
    CheckpointStore, RecordProvider, SyncError, SyncReport,
    extract::{extract_heart_rate, extract_sleep},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug)]
pub struct SyncOutcome {
    pub points: Vec<BiometricPoint>,
    pub report: SyncReport,
}

/// Runs checkpointed syncs against one provider, one at a time.
///
/// A sync requested while another is in flight is rejected with
/// [`SyncError::AlreadySyncing`] rather than started against the same
/// checkpoint.
pub struct SyncOrchestrator<P, C> {
    provider: P,
    checkpoint: C,
    in_flight: tokio::sync::Mutex<()>,
    state: Mutex<SyncState>,
    clock: fn() -> DateTime<Utc>,
}

impl<P, C> SyncOrchestrator<P, C>
where
    P: RecordProvider,
    C: CheckpointStore,
{
    pub fn new(provider: P, checkpoint: C) -> Self {
        Self {
            provider,
            checkpoint,
            in_flight: tokio::sync::Mutex::new(()),
            state: Mutex::new(SyncState::Idle),
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock used for windows and checkpoints.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> SyncState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn checkpoint(&self) -> &C {
        &self.checkpoint
    }

    fn set_state(&self, state: SyncState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub async fn sync(&self, mode: SyncMode) -> Result<Vec<BiometricPoint>, SyncError> {
        self.sync_with_report(mode).await.map(|outcome| outcome.points)
    }

    pub async fn sync_with_report(&self, mode: SyncMode) -> Result<SyncOutcome, SyncError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Sync requested while another sync is in progress");
            return Err(SyncError::AlreadySyncing);
        };

        self.set_state(SyncState::Syncing);
        let result = self.run(mode).await;
        self.set_state(match &result {
            Ok(_) => SyncState::Succeeded,
            Err(_) => SyncState::Failed,
        });

        result
    }

    /// Runs a sync to completion on a fresh single-threaded runtime.
    ///
    /// Must not be called from inside a tokio runtime.
    pub fn sync_blocking(&self, mode: SyncMode) -> Result<Vec<BiometricPoint>, SyncError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.sync(mode))
    }

    /// Spawns a sync on the current tokio runtime and hands the result to
    /// `callback` once it finishes.
    pub fn sync_with_callback<F>(self: &Arc<Self>, mode: SyncMode, callback: F) -> JoinHandle<()>
    where
        P: 'static,
        C: 'static,
        F: FnOnce(Result<Vec<BiometricPoint>, SyncError>) + Send + 'static,
    {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this.sync(mode).await;
            callback(result);
        })
    }

    async fn run(&self, mode: SyncMode) -> Result<SyncOutcome, SyncError> {
        if !self.provider.is_available().await {
            error!("Health data provider is not available");
            return Err(SyncError::ProviderUnavailable);
        }

        let last_sync = self.checkpoint.get().await.map_err(SyncError::Checkpoint)?;
        let window = resolve_window(mode, last_sync, (self.clock)());
        info!(
            "Reading health data from {} to {} (last sync: {})",
            window.start,
            window.end,
            describe_checkpoint(last_sync)
        );

        let (heart_rate, sleep) = tokio::join!(
            extract_heart_rate(&self.provider, window),
            extract_sleep(&self.provider, window),
        );
        let heart_rate_points = heart_rate.len();
        let sleep_points = sleep.len();

        let points = merge_points(heart_rate, sleep);

        let mut checkpoint_advanced = false;
        if !points.is_empty() {
            let synced_at = (self.clock)().timestamp_millis().max(last_sync);
            match self.checkpoint.set(synced_at).await {
                Ok(()) => checkpoint_advanced = true,
                Err(e) => error!("Failed to advance sync checkpoint: {e:#}"),
            }
        }

        let report = SyncReport {
            window,
            heart_rate_points,
            sleep_points,
            merged_points: points.len(),
            checkpoint_advanced,
        };
        info!("{report}");

        Ok(SyncOutcome { points, report })
    }
}

fn describe_checkpoint(millis: i64) -> String {
    if millis <= 0 {
        return "never".to_string();
    }
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
