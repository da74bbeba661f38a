//! Activity model.
//!
//! An activity is the smallest schedulable unit of work. It needs a fixed
//! headcount for its whole duration, accrues cost per unit of time, and
//! carries three graded risks:
//!
//! - **Delay**: chance the activity overruns, and by how many units.
//! - **Attrition**: chance people are lost, and how many.
//! - **Exposure**: how much the activity raises project-wide risk while active.
//!
//! # Duration Model
//! Durations come from a three-point estimate; see [`crate::estimation`].

use serde::{Deserialize, Serialize};

use super::RiskLevel;
use crate::estimation::ThreePointEstimate;

/// How an activity's cost rate is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBasis {
    /// `cost_rate` is per person per unit; multiplied by headcount.
    #[default]
    PerPerson,
    /// `cost_rate` is per unit regardless of headcount.
    Flat,
}

/// An activity template.
///
/// Immutable once handed to a graph; scheduling wraps it in a
/// [`ScheduledActivity`](super::ScheduledActivity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optimistic / likely / pessimistic duration.
    pub estimate: ThreePointEstimate,
    /// Headcount held for the whole duration.
    pub resources: u32,
    /// Currency per unit of time (per person under [`CostBasis::PerPerson`]).
    pub cost_rate: f64,
    /// Chance of delay.
    pub delay_risk: RiskLevel,
    /// Units added to the project when a delay fires.
    pub delay_weight: f64,
    /// Chance of losing people.
    pub attrition_risk: RiskLevel,
    /// People lost when attrition fires.
    pub attrition_weight: u32,
    /// Exposure contributed while active.
    pub exposure: RiskLevel,
    /// IDs of activities that must finish before this one starts.
    pub predecessors: Vec<String>,
}

impl Activity {
    /// Creates an activity with a one-unit duration and no resources or risk weights.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            estimate: ThreePointEstimate::default(),
            resources: 0,
            cost_rate: 0.0,
            delay_risk: RiskLevel::default(),
            delay_weight: 0.0,
            attrition_risk: RiskLevel::default(),
            attrition_weight: 0,
            exposure: RiskLevel::default(),
            predecessors: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the three-point estimate.
    pub fn with_estimate(mut self, estimate: ThreePointEstimate) -> Self {
        self.estimate = estimate;
        self
    }

    /// Sets the headcount.
    pub fn with_resources(mut self, resources: u32) -> Self {
        self.resources = resources;
        self
    }

    /// Sets the cost rate.
    pub fn with_cost_rate(mut self, cost_rate: f64) -> Self {
        self.cost_rate = cost_rate;
        self
    }

    /// Sets the delay risk and its magnitude in time units.
    pub fn with_delay_risk(mut self, level: RiskLevel, weight: f64) -> Self {
        self.delay_risk = level;
        self.delay_weight = weight;
        self
    }

    /// Sets the attrition risk and the headcount lost when it fires.
    pub fn with_attrition_risk(mut self, level: RiskLevel, weight: u32) -> Self {
        self.attrition_risk = level;
        self.attrition_weight = weight;
        self
    }

    /// Sets the exposure level.
    pub fn with_exposure(mut self, level: RiskLevel) -> Self {
        self.exposure = level;
        self
    }

    /// Adds a predecessor activity ID.
    pub fn with_predecessor(mut self, predecessor_id: impl Into<String>) -> Self {
        self.predecessors.push(predecessor_id.into());
        self
    }

    /// PERT expected duration.
    #[inline]
    pub fn expected_duration(&self) -> f64 {
        self.estimate.expected()
    }

    /// Duration on the unit grid.
    #[inline]
    pub fn duration_units(&self) -> u32 {
        self.estimate.duration_units()
    }

    /// Cost accrued per unit of time while active.
    pub fn cost_per_unit(&self, basis: CostBasis) -> f64 {
        match basis {
            CostBasis::PerPerson => self.cost_rate * self.resources as f64,
            CostBasis::Flat => self.cost_rate,
        }
    }

    /// Whether this activity has no predecessors.
    pub fn is_root(&self) -> bool {
        self.predecessors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_builder() {
        let act = Activity::new("A1")
            .with_name("Survey site")
            .with_estimate(ThreePointEstimate::new(1.0, 2.0, 9.0).unwrap())
            .with_resources(3)
            .with_cost_rate(150.0)
            .with_delay_risk(RiskLevel::High, 2.0)
            .with_attrition_risk(RiskLevel::Low, 1)
            .with_exposure(RiskLevel::Moderate)
            .with_predecessor("A0");

        assert_eq!(act.id, "A1");
        assert_eq!(act.name, "Survey site");
        assert!((act.expected_duration() - 3.0).abs() < 1e-10);
        assert_eq!(act.duration_units(), 3);
        assert_eq!(act.resources, 3);
        assert_eq!(act.delay_risk, RiskLevel::High);
        assert_eq!(act.delay_weight, 2.0);
        assert_eq!(act.attrition_weight, 1);
        assert_eq!(act.exposure, RiskLevel::Moderate);
        assert_eq!(act.predecessors, vec!["A0"]);
        assert!(!act.is_root());
    }

    #[test]
    fn test_name_defaults_to_id() {
        let act = Activity::new("X");
        assert_eq!(act.name, "X");
        assert!(act.is_root());
        assert_eq!(act.duration_units(), 1);
    }

    #[test]
    fn test_cost_basis() {
        let act = Activity::new("A").with_resources(4).with_cost_rate(10.0);
        assert_eq!(act.cost_per_unit(CostBasis::PerPerson), 40.0);
        assert_eq!(act.cost_per_unit(CostBasis::Flat), 10.0);
    }
}
