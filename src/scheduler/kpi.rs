//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest end offset |
//! | Overhead cost | Makespan × per-unit overhead |
//! | Activity cost | Σ duration × cost per unit |
//! | Peak usage | Highest headcount in any unit |
//! | Avg utilization | Headcount-units used / (capacity × makespan) |
//! | Peak exposure | Highest running exposure under multiplicative decay |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::config::SchedulerConfig;
use crate::models::Schedule;

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Latest end offset (units).
    pub makespan: u32,
    /// Makespan × overhead.
    pub overhead_cost: f64,
    /// Accrued activity cost.
    pub activity_cost: f64,
    /// Highest headcount in use in a single unit.
    pub peak_resource_usage: u32,
    /// Mean fraction of capacity in use over the makespan (0.0..1.0).
    pub avg_utilization: f64,
    /// Highest running exposure.
    pub peak_exposure: f64,
}

impl ScheduleKpi {
    /// Computes KPIs for a schedule under the configuration that produced it.
    pub fn calculate(schedule: &Schedule, config: &SchedulerConfig) -> Self {
        let makespan = schedule.makespan();
        let profile = schedule.resource_profile();

        let activity_cost: f64 = schedule
            .activities
            .iter()
            .map(|a| a.duration() as f64 * a.activity.cost_per_unit(config.cost_basis))
            .sum();

        let used: u64 = profile.values().map(|&u| u as u64).sum();
        let available = config.total_resources as u64 * makespan as u64;
        let avg_utilization = if available == 0 {
            0.0
        } else {
            used as f64 / available as f64
        };

        // Replay the exposure recurrence over the placed starts.
        let mut introduced = vec![0.0; makespan as usize + 1];
        for a in &schedule.activities {
            introduced[a.start as usize] += a.activity.exposure.value();
        }
        let mut running = 0.0_f64;
        let mut peak_exposure = 0.0_f64;
        for added in introduced {
            running = running * config.exposure_decay_factor + added;
            peak_exposure = peak_exposure.max(running);
        }

        Self {
            makespan,
            overhead_cost: makespan as f64 * config.daily_overhead,
            activity_cost,
            peak_resource_usage: profile.values().copied().max().unwrap_or(0),
            avg_utilization,
            peak_exposure,
        }
    }

    /// Overhead plus activity cost.
    pub fn total_cost(&self) -> f64 {
        self.overhead_cost + self.activity_cost
    }

    /// Whether the schedule meets the given thresholds.
    pub fn meets_thresholds(&self, max_makespan: u32, max_cost: f64) -> bool {
        self.makespan <= max_makespan && self.total_cost() <= max_cost
    }
}
