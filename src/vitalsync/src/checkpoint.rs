use std::{
    future::Future,
    sync::atomic::{AtomicI64, Ordering},
};

use vitalsync_db::DatabaseHandler;

/// Single cell holding the end of the last successful sync, in epoch millis.
pub trait CheckpointStore: Send + Sync {
    /// Returns 0 when no sync has completed yet.
    fn get(&self) -> impl Future<Output = anyhow::Result<i64>> + Send;

    fn set(&self, millis: i64) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl CheckpointStore for DatabaseHandler {
    async fn get(&self) -> anyhow::Result<i64> {
        self.get_last_sync().await
    }

    async fn set(&self, millis: i64) -> anyhow::Result<()> {
        self.set_last_sync(millis).await
    }
}

/// Process-local checkpoint, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryCheckpoint(AtomicI64);

impl MemoryCheckpoint {
    pub fn new(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }

    pub fn value(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

impl CheckpointStore for MemoryCheckpoint {
    async fn get(&self) -> anyhow::Result<i64> {
        Ok(self.value())
    }

    async fn set(&self, millis: i64) -> anyhow::Result<()> {
        self.0.store(millis, Ordering::SeqCst);
        Ok(())
    }
}
