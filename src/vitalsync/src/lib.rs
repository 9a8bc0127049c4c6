#[macro_use]
extern crate log;

mod error;
pub use error::{ProviderError, SyncError};

pub mod provider;
pub use provider::RecordProvider;

mod checkpoint;
pub use checkpoint::{CheckpointStore, MemoryCheckpoint};

pub mod extract;

mod report;
pub use report::SyncReport;

mod orchestrator;
pub use orchestrator::{SyncOrchestrator, SyncOutcome, SyncState};

pub use vitalsync_algos as algo;
pub use vitalsync_db::DatabaseHandler;
pub use vitalsync_types as types;
