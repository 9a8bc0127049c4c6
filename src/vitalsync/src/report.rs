use std::fmt;

use vitalsync_types::SyncWindow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncReport {
    pub window: SyncWindow,
    pub heart_rate_points: usize,
    pub sleep_points: usize,
    pub merged_points: usize,
    pub checkpoint_advanced: bool,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sync complete ({}):", self.window)?;
        writeln!(f, "  heart_rate: {}", self.heart_rate_points)?;
        writeln!(f, "  sleep:      {}", self.sleep_points)?;
        writeln!(f, "  merged:     {}", self.merged_points)?;
        write!(
            f,
            "  checkpoint: {}",
            if self.checkpoint_advanced {
                "advanced"
            } else {
                "unchanged"
            }
        )
    }
}
