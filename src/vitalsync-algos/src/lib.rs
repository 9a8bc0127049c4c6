pub(crate) mod window;
pub use window::{FIRST_SYNC_LOOKBACK, resolve_window};

pub(crate) mod sleep_quality;
pub use sleep_quality::{SleepQualityInput, StageBreakdown};

pub(crate) mod merge;
pub use merge::merge_points;
