//! Per-trial outcome records.

use serde::{Deserialize, Serialize};

/// Kind of stochastic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskEventKind {
    /// The activity overran; delay-days and cost grow.
    Delay,
    /// People were lost; the resource pool shrinks for good.
    Attrition,
}

/// A delay or attrition event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEvent {
    pub kind: RiskEventKind,
    /// Activity whose completion triggered the event.
    pub activity_id: String,
    /// Simulated time unit.
    pub time: u32,
    /// Delay units or people lost.
    pub magnitude: f64,
    /// Global exposure when the event fired.
    pub exposure: f64,
}

/// Outcome of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Trial index.
    pub trial: usize,
    /// Seed the trial ran with.
    pub seed: u64,
    /// Whether every activity finished.
    pub project_finished: bool,
    pub final_cost: f64,
    pub total_delay_days: f64,
    pub resources_remaining: u32,
    pub events: Vec<RiskEvent>,
    /// Finished activity IDs in completion order.
    pub finished_activities: Vec<String>,
    /// Activity IDs left pending when the trial stopped.
    pub unfinished_activities: Vec<String>,
    /// The activity that could never obtain resources, if the trial blocked.
    pub blocking_activity: Option<String>,
    /// Simulated units until completion or blockage.
    pub elapsed_time: u32,
    /// Completion reward minus final cost.
    pub net_value: f64,
}

impl SimulationResult {
    /// Whether the trial stopped on a deadlock.
    pub fn is_blocked(&self) -> bool {
        self.blocking_activity.is_some()
    }

    /// Events of one kind.
    pub fn events_of(&self, kind: RiskEventKind) -> impl Iterator<Item = &RiskEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}
