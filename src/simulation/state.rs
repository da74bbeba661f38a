//! Mutable state of a single trial.
//!
//! Built fresh for every trial and consumed into a
//! [`SimulationResult`](super::SimulationResult); nothing outlives the trial.

use super::{ExposureDecay, RiskEvent};

/// Lifecycle of an activity inside one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Pending,
    /// Running until the given unit.
    InProgress { finish_at: u32 },
    Done,
}

/// State of one trial, indexed in schedule order.
///
/// Headcount satisfies `available + held by running work - pending loss
/// == headcount` at every step.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Lifecycle of each activity, by schedule index.
    pub status: Vec<ActivityStatus>,
    /// People free to start new work.
    pub available_resources: u32,
    /// People still on the project, free or busy.
    pub headcount: u32,
    /// Risk level amplifying delay and attrition probabilities.
    pub global_exposure: f64,
    /// Simulated clock, in units.
    pub current_time: u32,
    /// Cost accrued so far, excluding overhead.
    pub cost: f64,
    /// Sum of delay weights of fired delay events.
    pub delay_days: f64,
    /// Delay and attrition events in firing order.
    pub events: Vec<RiskEvent>,
    /// Indices in completion order.
    pub completed: Vec<usize>,
    /// Index of the activity that deadlocked the trial.
    pub blocking_activity: Option<usize>,
    /// People lost while busy, taken as running work releases them.
    pending_loss: u32,
    last_decay: u32,
}

impl SimulationState {
    /// All activities pending, full resource pool, clock at zero.
    pub fn new(activity_count: usize, total_resources: u32) -> Self {
        Self {
            status: vec![ActivityStatus::Pending; activity_count],
            available_resources: total_resources,
            headcount: total_resources,
            global_exposure: 0.0,
            current_time: 0,
            cost: 0.0,
            delay_days: 0.0,
            events: Vec::new(),
            completed: Vec::with_capacity(activity_count),
            blocking_activity: None,
            pending_loss: 0,
            last_decay: 0,
        }
    }

    /// Decays exposure by the units elapsed since the last application.
    pub fn apply_decay(&mut self, decay: &ExposureDecay) {
        let elapsed = self.current_time.saturating_sub(self.last_decay);
        self.global_exposure = decay.apply(self.global_exposure, elapsed);
        self.last_decay = self.current_time;
    }

    /// Returns people freed by finished work to the pool, minus any loss
    /// still owed.
    pub fn release_resources(&mut self, count: u32) {
        let absorbed = count.min(self.pending_loss);
        self.pending_loss -= absorbed;
        self.available_resources += count - absorbed;
    }

    /// Permanently removes up to `count` people.
    ///
    /// Free people go first; the rest are taken from running work as it
    /// releases them, so the loss does not depend on timing.
    pub fn lose_resources(&mut self, count: u32) {
        let lost = count.min(self.headcount);
        self.headcount -= lost;
        let from_free = lost.min(self.available_resources);
        self.available_resources -= from_free;
        self.pending_loss += lost - from_free;
    }

    pub fn is_done(&self, index: usize) -> bool {
        self.status[index] == ActivityStatus::Done
    }

    pub fn all_done(&self) -> bool {
        self.status.iter().all(|s| *s == ActivityStatus::Done)
    }

    pub fn any_in_progress(&self) -> bool {
        self.status
            .iter()
            .any(|s| matches!(s, ActivityStatus::InProgress { .. }))
    }

    /// Indices still pending.
    pub fn pending(&self) -> impl Iterator<Item = usize> + '_ {
        self.status
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == ActivityStatus::Pending)
            .map(|(i, _)| i)
    }
}
