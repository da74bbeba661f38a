//! Scheduler and simulator configuration.
//!
//! Every field is optional in serialized form and falls back to the
//! defaults below. Load a combined [`PlanConfig`] from JSON:
//!
//! ```
//! use risk_schedule::config::PlanConfig;
//!
//! let config = PlanConfig::from_json_str(
//!     r#"{ "scheduler": { "total_resources": 4 }, "simulation": { "trials": 50 } }"#,
//! ).unwrap();
//! assert_eq!(config.scheduler.total_resources, 4);
//! assert_eq!(config.simulation.trials, 50);
//! assert_eq!(config.simulation.batch_size, 100);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dispatching::SchedulingPolicy;
use crate::error::{Error, Result};
use crate::models::CostBasis;
use crate::simulation::ExposureDecay;

/// Priority scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Headcount available in every unit.
    pub total_resources: u32,
    /// Project overhead charged per elapsed unit.
    pub daily_overhead: f64,
    /// Horizon over which the resource weight decays to zero.
    pub expected_project_duration: f64,
    /// Initial weight on headcount.
    pub resource_weight: f64,
    /// Initial weight on exposure.
    pub exposure_weight: f64,
    /// Exposure weight increase per unit of overshoot above the soft threshold.
    pub exposure_weight_gain: f64,
    /// Exposure above which the exposure weight starts growing.
    pub soft_exposure_threshold: f64,
    /// Exposure that no unit may exceed.
    pub hard_exposure_ceiling: f64,
    /// Multiplicative per-unit decay of the running exposure.
    pub exposure_decay_factor: f64,
    /// Units an activity may wait past its earliest start before failing.
    pub max_deferral: u32,
    /// Priority rule.
    pub policy: SchedulingPolicy,
    /// Cost-rate interpretation.
    pub cost_basis: CostBasis,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            total_resources: 10,
            daily_overhead: 1000.0,
            expected_project_duration: 100.0,
            resource_weight: 1.0,
            exposure_weight: 10.0,
            exposure_weight_gain: 1.0,
            soft_exposure_threshold: 0.75,
            hard_exposure_ceiling: 1.5,
            exposure_decay_factor: 0.9,
            max_deferral: 365,
            policy: SchedulingPolicy::RiskBalanced,
            cost_basis: CostBasis::PerPerson,
        }
    }
}

impl SchedulerConfig {
    /// Sets the headcount.
    pub fn with_total_resources(mut self, total_resources: u32) -> Self {
        self.total_resources = total_resources;
        self
    }

    /// Sets the priority rule.
    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the look-ahead window.
    pub fn with_max_deferral(mut self, max_deferral: u32) -> Self {
        self.max_deferral = max_deferral;
        self
    }

    /// Sets the soft threshold and hard ceiling for exposure.
    pub fn with_exposure_limits(mut self, soft: f64, hard: f64) -> Self {
        self.soft_exposure_threshold = soft;
        self.hard_exposure_ceiling = hard;
        self
    }

    /// Sets the per-unit overhead.
    pub fn with_daily_overhead(mut self, daily_overhead: f64) -> Self {
        self.daily_overhead = daily_overhead;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        non_negative("scheduler.daily_overhead", self.daily_overhead)?;
        non_negative("scheduler.expected_project_duration", self.expected_project_duration)?;
        non_negative("scheduler.resource_weight", self.resource_weight)?;
        non_negative("scheduler.exposure_weight", self.exposure_weight)?;
        non_negative("scheduler.exposure_weight_gain", self.exposure_weight_gain)?;
        non_negative("scheduler.soft_exposure_threshold", self.soft_exposure_threshold)?;
        non_negative("scheduler.hard_exposure_ceiling", self.hard_exposure_ceiling)?;
        if !(0.0..=1.0).contains(&self.exposure_decay_factor) {
            return Err(Error::InvalidConfig(format!(
                "scheduler.exposure_decay_factor must be within [0, 1], got {}",
                self.exposure_decay_factor
            )));
        }
        if self.soft_exposure_threshold > self.hard_exposure_ceiling {
            return Err(Error::InvalidConfig(
                "scheduler.soft_exposure_threshold exceeds hard_exposure_ceiling".into(),
            ));
        }
        Ok(())
    }
}

/// Monte Carlo simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Headcount at the start of every trial.
    pub total_resources: u32,
    /// Overhead charged per elapsed unit.
    pub daily_overhead: f64,
    /// How global exposure fades.
    pub exposure_decay: ExposureDecay,
    /// Number of trials.
    pub trials: usize,
    /// Results per sink flush.
    pub batch_size: usize,
    /// Value of a completed project; net value = reward − cost.
    pub completion_reward: f64,
    /// Base seed; trial `i` uses `seed + i`.
    pub seed: u64,
    /// Cost-rate interpretation.
    pub cost_basis: CostBasis,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_resources: 10,
            daily_overhead: 1000.0,
            exposure_decay: ExposureDecay::default(),
            trials: 1000,
            batch_size: 100,
            completion_reward: 1_000_000.0,
            seed: 0,
            cost_basis: CostBasis::PerPerson,
        }
    }
}

impl SimulationConfig {
    /// Sets the starting headcount.
    pub fn with_total_resources(mut self, total_resources: u32) -> Self {
        self.total_resources = total_resources;
        self
    }

    /// Sets the trial count.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Sets the flush batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the decay policy.
    pub fn with_exposure_decay(mut self, decay: ExposureDecay) -> Self {
        self.exposure_decay = decay;
        self
    }

    /// Sets the per-unit overhead.
    pub fn with_daily_overhead(mut self, daily_overhead: f64) -> Self {
        self.daily_overhead = daily_overhead;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        non_negative("simulation.daily_overhead", self.daily_overhead)?;
        if !self.completion_reward.is_finite() {
            return Err(Error::InvalidConfig(
                "simulation.completion_reward must be finite".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("simulation.batch_size must be at least 1".into()));
        }
        self.exposure_decay.validate()
    }
}

/// Combined configuration for one scheduling + simulation run.
///
/// Headcount, overhead and cost basis appear in both sections so each
/// stage can be configured alone; [`PlanConfig::validate`] requires them
/// to agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub scheduler: SchedulerConfig,
    pub simulation: SimulationConfig,
}

impl PlanConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validates both sections and checks that the simulator replays the
    /// schedule under the headcount, overhead and cost basis it was built
    /// with.
    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate()?;
        self.simulation.validate()?;
        let (sched, sim) = (&self.scheduler, &self.simulation);
        if sched.total_resources != sim.total_resources {
            return Err(Error::InvalidConfig(format!(
                "scheduler.total_resources ({}) differs from simulation.total_resources ({})",
                sched.total_resources, sim.total_resources
            )));
        }
        if sched.daily_overhead != sim.daily_overhead {
            return Err(Error::InvalidConfig(format!(
                "scheduler.daily_overhead ({}) differs from simulation.daily_overhead ({})",
                sched.daily_overhead, sim.daily_overhead
            )));
        }
        if sched.cost_basis != sim.cost_basis {
            return Err(Error::InvalidConfig(format!(
                "scheduler.cost_basis ({:?}) differs from simulation.cost_basis ({:?})",
                sched.cost_basis, sim.cost_basis
            )));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}
