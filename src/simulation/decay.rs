//! Exposure decay policies for the simulator.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How global exposure fades over elapsed units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureDecay {
    /// `exposure -= rate × elapsed`, floored at zero.
    Linear { rate: f64 },
    /// `exposure *= factor ^ elapsed`.
    Multiplicative { factor: f64 },
}

impl Default for ExposureDecay {
    fn default() -> Self {
        Self::Linear { rate: 0.05 }
    }
}

impl ExposureDecay {
    /// Exposure after `elapsed` units. Never negative.
    pub fn apply(&self, exposure: f64, elapsed: u32) -> f64 {
        if elapsed == 0 {
            return exposure.max(0.0);
        }
        let decayed = match *self {
            Self::Linear { rate } => exposure - rate * elapsed as f64,
            Self::Multiplicative { factor } => exposure * factor.powi(elapsed as i32),
        };
        decayed.max(0.0)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            Self::Linear { rate } if rate.is_finite() && rate >= 0.0 => Ok(()),
            Self::Multiplicative { factor } if (0.0..=1.0).contains(&factor) => Ok(()),
            other => Err(Error::InvalidConfig(format!(
                "simulation.exposure_decay out of range: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_decay() {
        let decay = ExposureDecay::Linear { rate: 0.1 };
        assert!((decay.apply(1.0, 3) - 0.7).abs() < 1e-10);
        assert_eq!(decay.apply(0.2, 5), 0.0);
    }

    #[test]
    fn test_multiplicative_decay() {
        let decay = ExposureDecay::Multiplicative { factor: 0.5 };
        assert!((decay.apply(1.0, 2) - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_zero_elapsed_is_identity() {
        let decay = ExposureDecay::Linear { rate: 0.5 };
        assert_eq!(decay.apply(0.8, 0), 0.8);
    }

    #[test]
    fn test_validate() {
        assert!(ExposureDecay::default().validate().is_ok());
        assert!(ExposureDecay::Linear { rate: -1.0 }.validate().is_err());
        assert!(ExposureDecay::Multiplicative { factor: 1.1 }.validate().is_err());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&ExposureDecay::Linear { rate: 0.05 }).unwrap();
        assert_eq!(json, r#"{"linear":{"rate":0.05}}"#);
    }
}
