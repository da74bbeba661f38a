//! Three-point duration estimation.
//!
//! Expected duration follows the Beta-PERT approximation:
//!
//! ```text
//! E = (o + 4m + p) / 6
//! σ = (p - o) / 6
//! ```
//!
//! # Reference
//! Malcolm et al. (1959), "Application of a Technique for Research and
//! Development Program Evaluation"

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Computes the PERT expected duration of an estimate triple.
///
/// Fails with [`Error::InvalidEstimate`] if any value is non-finite or
/// non-positive, exceeds [`MAX_DURATION`], or if
/// `optimistic <= likely <= pessimistic` does not hold.
///
/// ```
/// use risk_schedule::estimation::expected_duration;
///
/// assert_eq!(expected_duration(1.0, 4.0, 7.0).unwrap(), 4.0);
/// assert!(expected_duration(5.0, 4.0, 7.0).is_err());
/// ```
pub fn expected_duration(optimistic: f64, likely: f64, pessimistic: f64) -> Result<f64> {
    ThreePointEstimate::new(optimistic, likely, pessimistic).map(|e| e.expected())
}

/// Largest accepted estimate, in time units.
///
/// Keeps [`ThreePointEstimate::duration_units`] well inside `u32` and the
/// scheduler's per-unit ledger at a bounded size.
pub const MAX_DURATION: f64 = 1_000_000.0;

/// An optimistic / most-likely / pessimistic duration triple.
///
/// Only constructible in valid order through [`ThreePointEstimate::new`];
/// deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEstimate")]
pub struct ThreePointEstimate {
    optimistic: f64,
    likely: f64,
    pessimistic: f64,
}

#[derive(Deserialize)]
struct RawEstimate {
    optimistic: f64,
    likely: f64,
    pessimistic: f64,
}

impl TryFrom<RawEstimate> for ThreePointEstimate {
    type Error = Error;

    fn try_from(raw: RawEstimate) -> Result<Self> {
        Self::new(raw.optimistic, raw.likely, raw.pessimistic)
    }
}

impl ThreePointEstimate {
    /// Creates a validated estimate.
    ///
    /// Every point must be finite, positive and at most [`MAX_DURATION`].
    pub fn new(optimistic: f64, likely: f64, pessimistic: f64) -> Result<Self> {
        let finite = optimistic.is_finite() && likely.is_finite() && pessimistic.is_finite();
        if !finite
            || optimistic <= 0.0
            || optimistic > likely
            || likely > pessimistic
            || pessimistic > MAX_DURATION
        {
            return Err(Error::InvalidEstimate {
                optimistic,
                likely,
                pessimistic,
            });
        }
        Ok(Self {
            optimistic,
            likely,
            pessimistic,
        })
    }

    /// A degenerate estimate where all three points coincide.
    pub fn fixed(duration: f64) -> Result<Self> {
        Self::new(duration, duration, duration)
    }

    pub fn optimistic(&self) -> f64 {
        self.optimistic
    }

    pub fn likely(&self) -> f64 {
        self.likely
    }

    pub fn pessimistic(&self) -> f64 {
        self.pessimistic
    }

    /// PERT mean.
    #[inline]
    pub fn expected(&self) -> f64 {
        (self.optimistic + 4.0 * self.likely + self.pessimistic) / 6.0
    }

    /// PERT standard deviation.
    #[inline]
    pub fn standard_deviation(&self) -> f64 {
        (self.pessimistic - self.optimistic) / 6.0
    }

    /// Expected duration rounded up onto the unit grid, never below one unit.
    pub fn duration_units(&self) -> u32 {
        (self.expected().ceil() as u32).max(1)
    }
}

impl Default for ThreePointEstimate {
    fn default() -> Self {
        Self {
            optimistic: 1.0,
            likely: 1.0,
            pessimistic: 1.0,
        }
    }
}
