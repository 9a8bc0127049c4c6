mod point;
pub use point::BiometricPoint;

mod record;
pub use record::{
    HeartRateRecord, HeartRateSample, RecordType, SleepSession, SleepStage, SleepStageKind,
    required_permissions,
};

mod sync;
pub use sync::{SyncMode, SyncWindow};
