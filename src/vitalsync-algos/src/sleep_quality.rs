use std::ops::RangeInclusive;

use vitalsync_types::{SleepSession, SleepStage, SleepStageKind};

/// Whole minutes spent in each stage of one session. Stages whose kind is not
/// recognised are counted as light sleep and also tallied in `unclassified`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageBreakdown {
    pub deep: i32,
    pub light: i32,
    pub rem: i32,
    pub awake: i32,
    pub unclassified: i32,
}

impl StageBreakdown {
    pub fn from_stages(stages: &[SleepStage]) -> Self {
        let mut breakdown = Self::default();
        for stage in stages {
            let minutes = whole_minutes(stage.duration().num_seconds());
            match stage.kind() {
                SleepStageKind::Deep => breakdown.deep += minutes,
                SleepStageKind::Rem => breakdown.rem += minutes,
                SleepStageKind::Awake => breakdown.awake += minutes,
                SleepStageKind::Light => breakdown.light += minutes,
                SleepStageKind::Unknown => {
                    breakdown.light += minutes;
                    breakdown.unclassified += minutes;
                }
            }
        }
        breakdown
    }

    pub fn asleep(&self) -> i32 {
        self.deep + self.light + self.rem
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepQualityInput {
    pub duration_minutes: i32,
    pub deep_minutes: i32,
    pub light_minutes: i32,
    pub rem_minutes: i32,
    pub awake_minutes: i32,
    pub has_stages: bool,
}

impl SleepQualityInput {
    const BASE_SCORE: f64 = 0.5;
    const NO_SLEEP_SCORE: f64 = 0.1;

    const IDEAL_DURATION: RangeInclusive<i32> = 420..=540;
    const GOOD_DURATION: RangeInclusive<i32> = 360..=600;
    const SHORT_DURATION: i32 = 360;

    const IDEAL_DEEP_PCT: RangeInclusive<f64> = 15.0..=20.0;
    const GOOD_DEEP_PCT: RangeInclusive<f64> = 10.0..=25.0;
    const LOW_DEEP_PCT: f64 = 10.0;

    const IDEAL_REM_PCT: RangeInclusive<f64> = 20.0..=25.0;
    const GOOD_REM_PCT: RangeInclusive<f64> = 15.0..=30.0;
    const LOW_REM_PCT: f64 = 15.0;

    pub fn from_session(session: &SleepSession) -> Self {
        Self::with_breakdown(session, StageBreakdown::from_stages(&session.stages))
    }

    /// Like [`Self::from_session`], reusing a breakdown already computed for
    /// `session.stages`.
    pub fn with_breakdown(session: &SleepSession, breakdown: StageBreakdown) -> Self {
        Self::new(
            whole_minutes(session.duration().num_seconds()),
            breakdown,
            session.has_stages(),
        )
    }

    pub fn new(duration_minutes: i32, breakdown: StageBreakdown, has_stages: bool) -> Self {
        Self {
            duration_minutes,
            deep_minutes: breakdown.deep,
            light_minutes: breakdown.light,
            rem_minutes: breakdown.rem,
            awake_minutes: breakdown.awake,
            has_stages,
        }
    }

    /// Scores a night of sleep on `[0.0, 1.0]`.
    ///
    /// Without stage data only the duration is used. With stage data the score
    /// starts at 0.5 and each factor (duration, deep %, REM %, awake %) adds or
    /// removes a fixed amount; the first bracket that matches wins.
    pub fn score(&self) -> f64 {
        if !self.has_stages {
            return Self::duration_only_score(self.duration_minutes);
        }

        let total = self.deep_minutes + self.light_minutes + self.rem_minutes;
        if total == 0 {
            return Self::NO_SLEEP_SCORE;
        }

        let deep_pct = percent(self.deep_minutes, total);
        let rem_pct = percent(self.rem_minutes, total);
        let awake_pct = if self.duration_minutes == 0 {
            0.0
        } else {
            percent(self.awake_minutes, self.duration_minutes)
        };

        let score = Self::BASE_SCORE
            + Self::duration_adjustment(self.duration_minutes)
            + Self::deep_adjustment(deep_pct)
            + Self::rem_adjustment(rem_pct)
            + Self::awake_adjustment(awake_pct);

        score.clamp(0.0, 1.0)
    }

    fn duration_only_score(minutes: i32) -> f64 {
        match minutes {
            m if m < 360 => 0.3,
            m if m < 480 => 0.6,
            m if m < 600 => 0.9,
            _ => 0.7,
        }
    }

    fn duration_adjustment(minutes: i32) -> f64 {
        if Self::IDEAL_DURATION.contains(&minutes) {
            0.2
        } else if Self::GOOD_DURATION.contains(&minutes) {
            0.1
        } else if minutes < Self::SHORT_DURATION {
            -0.2
        } else {
            -0.1
        }
    }

    fn deep_adjustment(pct: f64) -> f64 {
        if Self::IDEAL_DEEP_PCT.contains(&pct) {
            0.15
        } else if Self::GOOD_DEEP_PCT.contains(&pct) {
            0.1
        } else if pct < Self::LOW_DEEP_PCT {
            -0.1
        } else {
            -0.05
        }
    }

    fn rem_adjustment(pct: f64) -> f64 {
        if Self::IDEAL_REM_PCT.contains(&pct) {
            0.1
        } else if Self::GOOD_REM_PCT.contains(&pct) {
            0.05
        } else if pct < Self::LOW_REM_PCT {
            -0.1
        } else {
            -0.05
        }
    }

    fn awake_adjustment(pct: f64) -> f64 {
        if pct < 5.0 {
            0.05
        } else if pct < 10.0 {
            0.0
        } else if pct < 20.0 {
            -0.1
        } else {
            -0.2
        }
    }
}

/// Floor of `seconds / 60`, never negative.
fn whole_minutes(seconds: i64) -> i32 {
    (seconds.max(0) / 60).try_into().unwrap_or(i32::MAX)
}

fn percent(part: i32, whole: i32) -> f64 {
    f64::from(part) * 100.0 / f64::from(whole)
}
