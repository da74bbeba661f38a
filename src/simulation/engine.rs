//! Monte Carlo replay of a fixed schedule.
//!
//! # Trial loop
//!
//! Each trial walks a simulated clock one unit at a time:
//!
//! 1. **Complete** running activities whose finish unit has arrived:
//!    release headcount, decay exposure, then draw a delay event with
//!    probability `p_delay × (1 + exposure)` and an attrition event with
//!    probability `p_attrition × (1 + exposure)`. Attrition shrinks the
//!    headcount for good; people busy elsewhere are taken when released.
//! 2. **Decay** global exposure by the units elapsed since last applied.
//! 3. **Start** pending activities whose scheduled start has passed, whose
//!    predecessors are done, and whose headcount is available. Exposure
//!    rises and the full projected cost is charged up front.
//! 4. **Deadlock check**: with nothing running, a ready activity that needs
//!    more headcount than remains can never start; the trial stops and
//!    records it as the blocking activity.
//! 5. Advance the clock.
//!
//! # Determinism
//! Trial `i` seeds its own generator with `seed + i`; trials share no
//! mutable state and may run in any order or in parallel.

use std::collections::HashMap;

use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::graph::ActivityGraph;
use crate::models::{Schedule, ScheduledActivity};

use super::{
    ActivityStatus, ResultSink, RiskEvent, RiskEventKind, SimulationResult, SimulationState,
};

/// Replays a schedule under stochastic delay and attrition.
///
/// # Example
///
/// ```
/// use risk_schedule::config::SimulationConfig;
/// use risk_schedule::models::{Activity, Schedule, ScheduledActivity};
/// use risk_schedule::simulation::MonteCarloSimulator;
///
/// let mut schedule = Schedule::new();
/// schedule.push(ScheduledActivity::new(Activity::new("A").with_resources(1), 0).unwrap());
///
/// let config = SimulationConfig::default().with_trials(10).with_seed(42);
/// let simulator = MonteCarloSimulator::new(schedule, config).unwrap();
/// let results = simulator.run();
///
/// assert_eq!(results.len(), 10);
/// assert!(results.iter().all(|r| r.project_finished));
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    schedule: Schedule,
    config: SimulationConfig,
    predecessors: Vec<Vec<usize>>,
}

impl MonteCarloSimulator {
    /// Prepares a simulator.
    ///
    /// # Errors
    /// Invalid configuration, duplicate IDs, predecessors missing from the
    /// schedule, or cyclic dependencies.
    pub fn new(schedule: Schedule, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let graph = ActivityGraph::from_activities(
            schedule.activities.iter().map(|s| s.activity.clone()),
        )?;
        graph.validate()?;

        let index: HashMap<&str, usize> = schedule
            .activities
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id(), i))
            .collect();
        let predecessors = schedule
            .activities
            .iter()
            .map(|s| {
                s.activity
                    .predecessors
                    .iter()
                    .map(|p| {
                        index
                            .get(p.as_str())
                            .copied()
                            .ok_or_else(|| Error::UnknownActivity(p.clone()))
                    })
                    .collect::<Result<Vec<usize>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            schedule,
            config,
            predecessors,
        })
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seed used by trial `trial`.
    pub fn seed_for(&self, trial: usize) -> u64 {
        self.config.seed.wrapping_add(trial as u64)
    }

    /// Runs one trial with its derived seed.
    pub fn run_trial(&self, trial: usize) -> SimulationResult {
        let seed = self.seed_for(trial);
        let mut rng = StdRng::seed_from_u64(seed);
        self.run_trial_with(trial, seed, &mut rng)
    }

    /// Runs one trial drawing from `rng`.
    pub fn run_trial_with<R: Rng + ?Sized>(
        &self,
        trial: usize,
        seed: u64,
        rng: &mut R,
    ) -> SimulationResult {
        let mut state =
            SimulationState::new(self.schedule.len(), self.config.total_resources);

        loop {
            self.complete_finished(&mut state, rng);
            state.apply_decay(&self.config.exposure_decay);
            self.start_ready(&mut state);

            if state.all_done() {
                break;
            }
            if let Some(blocker) = self.find_blocker(&state) {
                debug!(
                    trial,
                    activity = %self.activity(blocker).id(),
                    time = state.current_time,
                    available = state.available_resources,
                    "trial blocked"
                );
                state.blocking_activity = Some(blocker);
                break;
            }
            state.current_time += 1;
        }

        self.into_result(trial, seed, state)
    }

    /// Runs every trial in parallel and returns results in trial order.
    pub fn run(&self) -> Vec<SimulationResult> {
        let results: Vec<SimulationResult> = (0..self.config.trials)
            .into_par_iter()
            .map(|trial| self.run_trial(trial))
            .collect();
        let blocked = results.iter().filter(|r| r.is_blocked()).count();
        info!(trials = results.len(), blocked, "simulation complete");
        results
    }

    /// Runs every trial in parallel, streaming results to `sink`.
    ///
    /// Workers feed a bounded channel drained by a single writer thread,
    /// which hands the sink `batch_size` results at a time. Arrival order
    /// is unspecified. Returns the number of results written.
    pub fn run_into<S: ResultSink>(&self, sink: &mut S) -> Result<usize> {
        let batch_size = self.config.batch_size.max(1);
        let (tx, rx) = crossbeam_channel::bounded::<SimulationResult>(batch_size);

        let written = std::thread::scope(|scope| {
            let writer = scope.spawn(move || write_batches(rx, sink, batch_size));
            (0..self.config.trials)
                .into_par_iter()
                .for_each_with(tx, |tx, trial| {
                    // Send fails only once the writer has stopped; its error surfaces on join.
                    let _ = tx.send(self.run_trial(trial));
                });
            writer
                .join()
                .map_err(|_| Error::Sink("writer thread panicked".into()))?
        })?;

        info!(trials = written, "simulation results written");
        Ok(written)
    }

    fn activity(&self, index: usize) -> &ScheduledActivity {
        &self.schedule.activities[index]
    }

    fn preconditions_met(&self, index: usize, state: &SimulationState) -> bool {
        self.activity(index).start <= state.current_time
            && self.predecessors[index].iter().all(|&p| state.is_done(p))
    }

    fn complete_finished<R: Rng + ?Sized>(&self, state: &mut SimulationState, rng: &mut R) {
        let now = state.current_time;
        for index in 0..state.status.len() {
            let ActivityStatus::InProgress { finish_at } = state.status[index] else {
                continue;
            };
            if finish_at > now {
                continue;
            }

            let scheduled = self.activity(index);
            let activity = &scheduled.activity;
            state.status[index] = ActivityStatus::Done;
            state.completed.push(index);
            state.release_resources(activity.resources);
            state.apply_decay(&self.config.exposure_decay);

            let amplifier = 1.0 + state.global_exposure;
            let delay_roll: f64 = rng.random();
            let attrition_roll: f64 = rng.random();

            if delay_roll < (activity.delay_risk.value() * amplifier).min(1.0) {
                state.delay_days += activity.delay_weight;
                state.cost += activity.delay_weight * activity.cost_per_unit(self.config.cost_basis);
                state.events.push(RiskEvent {
                    kind: RiskEventKind::Delay,
                    activity_id: activity.id.clone(),
                    time: now,
                    magnitude: activity.delay_weight,
                    exposure: state.global_exposure,
                });
            }

            if attrition_roll < (activity.attrition_risk.value() * amplifier).min(1.0) {
                state.lose_resources(activity.attrition_weight);
                state.events.push(RiskEvent {
                    kind: RiskEventKind::Attrition,
                    activity_id: activity.id.clone(),
                    time: now,
                    magnitude: activity.attrition_weight as f64,
                    exposure: state.global_exposure,
                });
            }
        }
    }

    fn start_ready(&self, state: &mut SimulationState) {
        let now = state.current_time;
        for index in 0..state.status.len() {
            if state.status[index] != ActivityStatus::Pending
                || !self.preconditions_met(index, state)
            {
                continue;
            }
            let scheduled = self.activity(index);
            let activity = &scheduled.activity;
            if activity.resources > state.available_resources {
                continue;
            }

            let duration = scheduled.duration();
            state.status[index] = ActivityStatus::InProgress {
                finish_at: now.saturating_add(duration),
            };
            state.available_resources -= activity.resources;
            state.global_exposure += activity.exposure.value();
            state.cost += duration as f64 * activity.cost_per_unit(self.config.cost_basis);
        }
    }

    fn find_blocker(&self, state: &SimulationState) -> Option<usize> {
        if state.any_in_progress() {
            return None;
        }
        state.pending().find(|&index| {
            self.preconditions_met(index, state)
                && self.activity(index).activity.resources > state.available_resources
        })
    }

    fn into_result(&self, trial: usize, seed: u64, state: SimulationState) -> SimulationResult {
        let ids = |indices: &mut dyn Iterator<Item = usize>| -> Vec<String> {
            indices.map(|i| self.activity(i).id().to_string()).collect()
        };
        let finished_activities = ids(&mut state.completed.iter().copied());
        let unfinished_activities = ids(&mut state.pending());

        let final_cost = state.cost + state.current_time as f64 * self.config.daily_overhead;
        SimulationResult {
            trial,
            seed,
            project_finished: state.blocking_activity.is_none() && unfinished_activities.is_empty(),
            final_cost,
            total_delay_days: state.delay_days,
            resources_remaining: state.headcount,
            events: state.events,
            finished_activities,
            unfinished_activities,
            blocking_activity: state
                .blocking_activity
                .map(|i| self.activity(i).id().to_string()),
            elapsed_time: state.current_time,
            net_value: self.config.completion_reward - final_cost,
        }
    }
}

fn write_batches<S: ResultSink>(
    rx: Receiver<SimulationResult>,
    sink: &mut S,
    batch_size: usize,
) -> Result<usize> {
    let mut batch = Vec::with_capacity(batch_size);
    let mut written = 0;
    for result in rx {
        batch.push(result);
        if batch.len() == batch_size {
            sink.write_batch(&batch)?;
            written += batch.len();
            batch.clear();
        }
    }
    if !batch.is_empty() {
        sink.write_batch(&batch)?;
        written += batch.len();
    }
    sink.finish()?;
    Ok(written)
}
