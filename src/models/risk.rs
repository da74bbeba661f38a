//! Discrete risk categories.
//!
//! Input data grades each risk on a 1–5 scale. The scale maps to a
//! probability (for delay and attrition draws) or an exposure weight
//! through one fixed table.
//!
//! | Level | Value |
//! |-------|-------|
//! | 1 | 0.05 |
//! | 2 | 0.10 |
//! | 3 | 0.20 |
//! | 4 | 0.35 |
//! | 5 | 0.50 |

use serde::{Deserialize, Serialize};
use std::fmt;

const LOOKUP: [f64; 5] = [0.05, 0.10, 0.20, 0.35, 0.50];

/// A risk category on the 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RiskLevel {
    #[default]
    VeryLow = 1,
    Low = 2,
    Moderate = 3,
    High = 4,
    VeryHigh = 5,
}

impl RiskLevel {
    /// Numeric value from the lookup table.
    #[inline]
    pub fn value(self) -> f64 {
        LOOKUP[self as usize - 1]
    }

    /// The 1–5 grade.
    #[inline]
    pub fn grade(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = InvalidRiskLevel;

    fn try_from(grade: u8) -> Result<Self, Self::Error> {
        match grade {
            1 => Ok(Self::VeryLow),
            2 => Ok(Self::Low),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::High),
            5 => Ok(Self::VeryHigh),
            other => Err(InvalidRiskLevel(other)),
        }
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> Self {
        level.grade()
    }
}

/// A grade outside 1–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRiskLevel(pub u8);

impl fmt::Display for InvalidRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "risk level must be within 1..=5, got {}", self.0)
    }
}

impl std::error::Error for InvalidRiskLevel {}
