//! Schedule (solution) model.
//!
//! A schedule assigns every activity a start and end offset on the unit
//! grid, measured from project start (offset 0). Activities are kept in
//! the order the scheduler placed them, which need not be start order.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::Activity;
use crate::error::{Error, Result};

/// A complete schedule with its projected cost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Total projected cost (overhead plus accrued activity cost).
    pub total_cost: f64,
    /// Placed activities in placement order.
    pub activities: Vec<ScheduledActivity>,
}

/// An activity with its assigned interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledActivity {
    #[serde(flatten)]
    pub activity: Activity,
    /// Start offset (units).
    pub start: u32,
    /// End offset (units, exclusive).
    pub end: u32,
}

/// A broken schedule invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related activity ID, or the time unit for capacity violations.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Activity starts before a predecessor ends.
    PrecedenceViolation,
    /// Headcount in some unit exceeds capacity.
    CapacityExceeded,
    /// Activity names a predecessor that is not in the schedule.
    MissingPredecessor,
}

impl ScheduledActivity {
    /// Places an activity at `start` for its grid duration.
    ///
    /// Fails with [`Error::Unschedulable`] if the end offset would not fit
    /// in a `u32`.
    pub fn new(activity: Activity, start: u32) -> Result<Self> {
        let end = start
            .checked_add(activity.duration_units())
            .ok_or_else(|| Error::Unschedulable(activity.id.clone()))?;
        Ok(Self {
            activity,
            start,
            end,
        })
    }

    /// Activity ID.
    #[inline]
    pub fn id(&self) -> &str {
        &self.activity.id
    }

    /// Length of the interval in units.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the interval covers `unit`.
    #[inline]
    pub fn spans(&self, unit: u32) -> bool {
        self.start <= unit && unit < self.end
    }
}

impl Violation {
    fn precedence(activity_id: &str, message: String) -> Self {
        Self {
            violation_type: ViolationType::PrecedenceViolation,
            entity_id: activity_id.to_string(),
            message,
        }
    }

    fn capacity(unit: u32, message: String) -> Self {
        Self {
            violation_type: ViolationType::CapacityExceeded,
            entity_id: unit.to_string(),
            message,
        }
    }

    fn missing(activity_id: &str, message: String) -> Self {
        Self {
            violation_type: ViolationType::MissingPredecessor,
            entity_id: activity_id.to_string(),
            message,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a placed activity.
    pub fn push(&mut self, scheduled: ScheduledActivity) {
        self.activities.push(scheduled);
    }

    /// Sets the projected cost.
    pub fn with_total_cost(mut self, total_cost: f64) -> Self {
        self.total_cost = total_cost;
        self
    }

    /// Number of activities.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the schedule has no activities.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Latest end offset (0 for an empty schedule).
    pub fn makespan(&self) -> u32 {
        self.activities.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// Finds a placed activity by ID.
    pub fn get(&self, activity_id: &str) -> Option<&ScheduledActivity> {
        self.activities.iter().find(|a| a.id() == activity_id)
    }

    /// Activities sorted by start, ties by end.
    pub fn by_start(&self) -> Vec<&ScheduledActivity> {
        let mut sorted: Vec<&ScheduledActivity> = self.activities.iter().collect();
        sorted.sort_by_key(|a| (a.start, a.end));
        sorted
    }

    /// Headcount in use per unit, for units with non-zero usage.
    pub fn resource_profile(&self) -> BTreeMap<u32, u32> {
        let mut profile = BTreeMap::new();
        for a in &self.activities {
            for unit in a.start..a.end {
                *profile.entry(unit).or_insert(0) += a.activity.resources;
            }
        }
        profile.retain(|_, used| *used > 0);
        profile
    }

    /// Checks precedence and capacity invariants.
    ///
    /// Returns an empty list for a valid schedule.
    pub fn violations(&self, capacity: u32) -> Vec<Violation> {
        let mut violations = Vec::new();
        let ends: HashMap<&str, u32> = self.activities.iter().map(|a| (a.id(), a.end)).collect();

        for a in &self.activities {
            for pred in &a.activity.predecessors {
                match ends.get(pred.as_str()) {
                    Some(&pred_end) if a.start < pred_end => {
                        violations.push(Violation::precedence(
                            a.id(),
                            format!(
                                "'{}' starts at {} before predecessor '{}' ends at {}",
                                a.id(),
                                a.start,
                                pred,
                                pred_end
                            ),
                        ));
                    }
                    Some(_) => {}
                    None => violations.push(Violation::missing(
                        a.id(),
                        format!("'{}' depends on unscheduled '{}'", a.id(), pred),
                    )),
                }
            }
        }

        for (unit, used) in self.resource_profile() {
            if used > capacity {
                violations.push(Violation::capacity(
                    unit,
                    format!("unit {unit} uses {used} of {capacity} resources"),
                ));
            }
        }

        violations
    }
}
