//! Timing windows and grades
//!
//! Maps the absolute distance between a keypress and a note's scheduled
//! time onto a grade. Windows are half-open: a diff equal to a threshold
//! falls into the next, worse band.

use crate::{bail, Result};
use serde::{Deserialize, Serialize};

/// Four ascending timing thresholds in milliseconds.
///
/// `bad` is the outer catch window: a note further than `bad` in the past
/// can no longer be hit and is swept as a miss.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTolerances")]
pub struct Tolerances {
    perfect: f64,
    great: f64,
    good: f64,
    bad: f64,
}

#[derive(Deserialize)]
struct RawTolerances {
    perfect: f64,
    great: f64,
    good: f64,
    bad: f64,
}

impl TryFrom<RawTolerances> for Tolerances {
    type Error = anyhow::Error;

    fn try_from(raw: RawTolerances) -> Result<Self> {
        Self::new(raw.perfect, raw.great, raw.good, raw.bad)
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            perfect: 100.,
            great: 200.,
            good: 300.,
            bad: 500.,
        }
    }
}

impl Tolerances {
    pub fn new(perfect: f64, great: f64, good: f64, bad: f64) -> Result<Self> {
        let bands = [("perfect", perfect), ("great", great), ("good", good), ("bad", bad)];
        for (name, value) in bands {
            if !value.is_finite() || value < 0. {
                bail!("tolerance `{name}` must be a non-negative number, got {value}");
            }
        }
        for pair in bands.windows(2) {
            let ((lo_name, lo), (hi_name, hi)) = (pair[0], pair[1]);
            if lo >= hi {
                bail!("tolerance `{lo_name}` ({lo}) must be smaller than `{hi_name}` ({hi})");
            }
        }
        Ok(Self {
            perfect,
            great,
            good,
            bad,
        })
    }

    pub fn perfect(&self) -> f64 {
        self.perfect
    }

    pub fn great(&self) -> f64 {
        self.great
    }

    pub fn good(&self) -> f64 {
        self.good
    }

    /// Outer catch window.
    pub fn bad(&self) -> f64 {
        self.bad
    }

    /// Earliest scheduled time a note may have and still be hittable at
    /// `elapsed_ms`. The resolver and the miss sweeper must both use this.
    #[inline]
    pub fn min_eligible_time(&self, elapsed_ms: f64) -> f64 {
        elapsed_ms - self.bad
    }

    /// Grade an absolute time difference.
    pub fn grade(&self, diff_ms: f64) -> Grade {
        if diff_ms < self.perfect {
            Grade::Perfect
        } else if diff_ms < self.great {
            Grade::Great
        } else if diff_ms < self.good {
            Grade::Good
        } else if diff_ms < self.bad {
            Grade::Bad
        } else {
            // Also covers NaN
            Grade::None
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Perfect,
    Great,
    Good,
    Bad,
    /// Outside every window; never scored.
    None,
}

impl Grade {
    /// Fraction of the per-hit maximum this grade is worth.
    pub fn score_ratio(self) -> f64 {
        match self {
            Self::Perfect => 1.,
            Self::Great => 0.75,
            Self::Good => 0.45,
            Self::Bad | Self::None => 0.,
        }
    }

    pub fn score(self, max_score_per_hit: f64) -> f64 {
        max_score_per_hit * self.score_ratio()
    }

    /// Perfect and Great extend the combo, everything else breaks it.
    pub fn keeps_combo(self) -> bool {
        matches!(self, Self::Perfect | Self::Great)
    }

    pub fn is_hit(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Lower is better.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Great => "great",
            Self::Good => "good",
            Self::Bad => "bad",
            Self::None => "none",
        }
    }
}

/// Whether a hit landed before or after the note's scheduled time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Early,
    Exact,
    Late,
}

impl Timing {
    const EXACT_THRESHOLD_MS: f64 = 1.0;

    /// `offset_ms` is `elapsed - scheduled`: negative means the key went
    /// down before the note arrived.
    pub fn from_offset(offset_ms: f64) -> Self {
        if offset_ms < -Self::EXACT_THRESHOLD_MS {
            Self::Early
        } else if offset_ms > Self::EXACT_THRESHOLD_MS {
            Self::Late
        } else {
            Self::Exact
        }
    }
}
