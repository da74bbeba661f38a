//! Risk-aware, resource-constrained priority scheduler.
//!
//! # Algorithm
//!
//! A parallel schedule-generation scheme over discrete time units:
//!
//! 1. Advance the ledger to unit `t` (running exposure decays).
//! 2. Adapt weights: the resource weight falls linearly toward zero over the
//!    expected project duration; the exposure weight grows with every unit
//!    of exposure above the soft threshold.
//! 3. Score every released activity whose predecessors have all ended by
//!    `t` and push it on a binary heap (lowest score first, ties by
//!    insertion order).
//! 4. Pop and place each activity that fits headcount capacity and the hard
//!    exposure ceiling over its whole span. Placed activities release
//!    successors whose predecessors are now all placed.
//! 5. Activities that did not fit are retried at `t + 1`. Waiting for
//!    headcount held by placed work is plain queueing and never fails the
//!    run. An activity whose headcount is free over its whole span but which
//!    is still held back by the exposure ceiling for `max_deferral`
//!    consecutive units fails the run.
//!
//! Finished nodes are tracked with remaining in-degree counters; the input
//! graph is never mutated.
//!
//! # Complexity
//! O(T · (r log r + r · d)) where T = makespan, r = ready activities per
//! unit, d = activity duration.
//!
//! # Reference
//! Kolisch (1996), "Serial and parallel resource-constrained project
//! scheduling methods revisited", EJOR 90(2)

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;
use crate::dispatching::{PriorityContext, PriorityRule};
use crate::error::{Error, Result};
use crate::graph::ActivityGraph;
use crate::models::{Activity, Schedule, ScheduledActivity};

use super::Ledger;

/// Priority scheduler.
///
/// # Example
///
/// ```
/// use risk_schedule::config::SchedulerConfig;
/// use risk_schedule::estimation::ThreePointEstimate;
/// use risk_schedule::graph::ActivityGraph;
/// use risk_schedule::models::Activity;
/// use risk_schedule::scheduler::PriorityScheduler;
///
/// let graph = ActivityGraph::from_activities(vec![
///     Activity::new("A")
///         .with_estimate(ThreePointEstimate::fixed(2.0).unwrap())
///         .with_resources(2),
///     Activity::new("B")
///         .with_estimate(ThreePointEstimate::fixed(3.0).unwrap())
///         .with_resources(2)
///         .with_predecessor("A"),
/// ]).unwrap();
///
/// let scheduler = PriorityScheduler::new(SchedulerConfig::default().with_total_resources(2));
/// let schedule = scheduler.schedule(&graph).unwrap();
///
/// assert_eq!(schedule.get("B").unwrap().start, 2);
/// assert_eq!(schedule.makespan(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct PriorityScheduler {
    config: SchedulerConfig,
    rule: Arc<dyn PriorityRule>,
}

/// Adaptive weights carried across units.
#[derive(Debug, Clone, Copy)]
struct Weights {
    resource: f64,
    exposure: f64,
}

impl Weights {
    fn initial(config: &SchedulerConfig) -> Self {
        Self {
            resource: config.resource_weight,
            exposure: config.exposure_weight,
        }
    }

    fn adapt(&mut self, unit: u32, exposure: f64, config: &SchedulerConfig) {
        let progress = if config.expected_project_duration > 0.0 {
            unit as f64 / config.expected_project_duration
        } else {
            1.0
        };
        self.resource = config.resource_weight * (1.0 - progress).max(0.0);
        let overshoot = (exposure - config.soft_exposure_threshold).max(0.0);
        self.exposure += config.exposure_weight_gain * overshoot;
    }
}

/// Heap entry: lowest score pops first, then lowest slot.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f64,
    slot: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

/// An activity whose predecessors are all placed.
#[derive(Debug, Clone, Copy)]
struct Released {
    slot: usize,
    earliest: u32,
}

impl PriorityScheduler {
    /// Creates a scheduler using the rule named by `config.policy`.
    pub fn new(config: SchedulerConfig) -> Self {
        let rule = config.policy.rule();
        Self { config, rule }
    }

    /// Replaces the priority rule.
    pub fn with_rule<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rule = Arc::new(rule);
        self
    }

    /// Scheduler configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Builds a graph from activities and schedules it.
    pub fn schedule_activities<I>(&self, activities: I) -> Result<Schedule>
    where
        I: IntoIterator<Item = Activity>,
    {
        let graph = ActivityGraph::from_activities(activities)?;
        self.schedule(&graph)
    }

    /// Produces a schedule for every activity in the graph.
    ///
    /// # Errors
    /// - [`Error::InvalidConfig`] if the configuration fails validation.
    /// - [`Error::CyclicDependency`] if the graph is not a DAG.
    /// - [`Error::Unschedulable`] if an activity can never fit, or is held
    ///   back by the exposure ceiling for `max_deferral` units while its
    ///   headcount is free.
    pub fn schedule(&self, graph: &ActivityGraph) -> Result<Schedule> {
        let config = &self.config;
        config.validate()?;
        graph.validate()?;

        for activity in graph.activities() {
            self.check_placeable(activity)?;
        }

        let slot_count = graph.slot_count();
        let mut remaining_preds: Vec<usize> = (0..slot_count)
            .map(|slot| graph.predecessor_slots(slot).len())
            .collect();
        let mut earliest: Vec<u32> = vec![0; slot_count];
        let mut released: Vec<Released> = graph
            .live_slots()
            .filter(|&slot| remaining_preds[slot] == 0)
            .map(|slot| Released { slot, earliest: 0 })
            .collect();

        let total = graph.len();
        let mut schedule = Schedule::new();
        let mut ledger = Ledger::new(config.total_resources, config.exposure_decay_factor);
        let mut weights = Weights::initial(config);
        let mut placed = vec![false; slot_count];
        // First unit of the current run of exposure-only rejections.
        let mut stalled_since: Vec<Option<u32>> = vec![None; slot_count];
        let mut unit: u32 = 0;

        while schedule.len() < total {
            ledger.advance_to(unit);
            weights.adapt(unit, ledger.exposure(), config);
            let context = PriorityContext::at_unit(unit)
                .with_exposure(ledger.exposure())
                .with_weights(weights.resource, weights.exposure);

            let mut heap: BinaryHeap<Candidate> = released
                .iter()
                .filter(|r| r.earliest <= unit)
                .filter_map(|r| {
                    let activity = graph.activity_at(r.slot)?;
                    Some(Candidate {
                        score: self.rule.evaluate(activity, &context),
                        slot: r.slot,
                    })
                })
                .collect();

            let mut newly_released = Vec::new();
            while let Some(candidate) = heap.pop() {
                let Some(activity) = graph.activity_at(candidate.slot) else {
                    continue;
                };
                let duration = activity.duration_units();
                let exposure = activity.exposure.value();
                if !ledger.fits(duration, activity.resources, exposure, config.hard_exposure_ceiling) {
                    stalled_since[candidate.slot] =
                        if ledger.has_headcount(duration, activity.resources) {
                            stalled_since[candidate.slot].or(Some(unit))
                        } else {
                            None
                        };
                    continue;
                }

                let scheduled = ScheduledActivity::new(activity.clone(), unit)?;
                ledger.place(
                    duration,
                    activity.resources,
                    activity.cost_per_unit(config.cost_basis),
                    exposure,
                );
                debug!(
                    activity = %activity.id,
                    start = scheduled.start,
                    end = scheduled.end,
                    score = candidate.score,
                    "placed activity"
                );
                placed[candidate.slot] = true;

                for &succ in graph.successor_slots(candidate.slot) {
                    remaining_preds[succ] -= 1;
                    earliest[succ] = earliest[succ].max(scheduled.end);
                    if remaining_preds[succ] == 0 {
                        newly_released.push(Released {
                            slot: succ,
                            earliest: earliest[succ],
                        });
                    }
                }
                schedule.push(scheduled);
            }

            released.retain(|r| !placed[r.slot]);
            if let Some(stuck) = released.iter().find(|r| {
                matches!(stalled_since[r.slot], Some(since) if unit - since >= config.max_deferral)
            }) {
                let id = graph.activity_at(stuck.slot).map_or("", |a| a.id.as_str());
                warn!(activity = %id, unit, "activity exceeded look-ahead window");
                return Err(Error::Unschedulable(id.to_string()));
            }
            released.extend(newly_released);
            unit += 1;
        }

        let makespan = schedule.makespan();
        let total_cost = makespan as f64 * config.daily_overhead + ledger.total_cost();
        info!(
            activities = total,
            makespan,
            total_cost,
            peak_exposure = ledger.peak_exposure(),
            rule = self.rule.name(),
            "schedule complete"
        );
        Ok(schedule.with_total_cost(total_cost))
    }

    /// Rejects activities that could not fit even on an empty ledger.
    fn check_placeable(&self, activity: &Activity) -> Result<()> {
        let config = &self.config;
        if activity.resources > config.total_resources {
            warn!(
                activity = %activity.id,
                required = activity.resources,
                capacity = config.total_resources,
                "activity needs more resources than available"
            );
            return Err(Error::Unschedulable(activity.id.clone()));
        }
        if activity.exposure.value() > config.hard_exposure_ceiling {
            warn!(
                activity = %activity.id,
                exposure = activity.exposure.value(),
                ceiling = config.hard_exposure_ceiling,
                "activity exposure exceeds hard ceiling"
            );
            return Err(Error::Unschedulable(activity.id.clone()));
        }
        Ok(())
    }
}

impl Default for PriorityScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::{rules, SchedulingPolicy};
    use crate::estimation::ThreePointEstimate;
    use crate::models::RiskLevel;

    fn make_activity(id: &str, duration: f64, resources: u32) -> Activity {
        Activity::new(id)
            .with_estimate(ThreePointEstimate::fixed(duration).unwrap())
            .with_resources(resources)
            .with_cost_rate(10.0)
    }

    fn scheduler(capacity: u32) -> PriorityScheduler {
        PriorityScheduler::new(SchedulerConfig::default().with_total_resources(capacity))
    }

    #[test]
    fn test_chain_under_tight_capacity() {
        let schedule = scheduler(2)
            .schedule_activities(vec![
                make_activity("A", 2.0, 2),
                make_activity("B", 3.0, 2).with_predecessor("A"),
            ])
            .unwrap();

        let a = schedule.get("A").unwrap();
        let b = schedule.get("B").unwrap();
        assert_eq!((a.start, a.end), (0, 2));
        assert_eq!((b.start, b.end), (2, 5));
        assert!(schedule.violations(2).is_empty());
    }

    #[test]
    fn test_total_cost() {
        let mut config = SchedulerConfig::default()
            .with_total_resources(2)
            .with_daily_overhead(100.0);
        config.cost_basis = crate::models::CostBasis::PerPerson;
        let schedule = PriorityScheduler::new(config)
            .schedule_activities(vec![
                make_activity("A", 2.0, 2),
                make_activity("B", 3.0, 2).with_predecessor("A"),
            ])
            .unwrap();
        // overhead 5 * 100 + A 2*10*2 + B 3*10*2
        assert!((schedule.total_cost - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_when_capacity_allows() {
        let schedule = scheduler(4)
            .schedule_activities(vec![make_activity("A", 2.0, 2), make_activity("B", 2.0, 2)])
            .unwrap();
        assert_eq!(schedule.get("A").unwrap().start, 0);
        assert_eq!(schedule.get("B").unwrap().start, 0);
        assert_eq!(schedule.makespan(), 2);
    }

    #[test]
    fn test_serialized_when_capacity_short() {
        let schedule = scheduler(3)
            .schedule_activities(vec![make_activity("A", 2.0, 2), make_activity("B", 2.0, 2)])
            .unwrap();
        assert_eq!(schedule.makespan(), 4);
        assert!(schedule.violations(3).is_empty());
    }

    #[test]
    fn test_requirement_above_capacity_is_unschedulable() {
        let result = scheduler(1)
            .schedule_activities(vec![make_activity("A", 1.0, 2), make_activity("B", 1.0, 2)]);
        assert!(matches!(result, Err(Error::Unschedulable(_))));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let result = scheduler(5).schedule_activities(vec![
            make_activity("A", 1.0, 1).with_predecessor("B"),
            make_activity("B", 1.0, 1).with_predecessor("A"),
        ]);
        assert!(matches!(result, Err(Error::CyclicDependency(_))));
    }

    #[test]
    fn test_empty_graph() {
        let schedule = scheduler(5).schedule(&ActivityGraph::new()).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.total_cost, 0.0);
    }

    #[test]
    fn test_placement_order_is_completion_order() {
        let schedule = scheduler(1)
            .schedule_activities(vec![
                make_activity("first", 1.0, 1),
                make_activity("second", 1.0, 1),
            ])
            .unwrap();
        let ids: Vec<&str> = schedule.activities.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_risk_balanced_defers_exposure() {
        let activities = vec![
            make_activity("risky", 1.0, 1).with_exposure(RiskLevel::VeryHigh),
            make_activity("safe", 1.0, 1).with_exposure(RiskLevel::VeryLow),
        ];
        let schedule = scheduler(1).schedule_activities(activities.clone()).unwrap();
        assert_eq!(schedule.get("safe").unwrap().start, 0);
        assert_eq!(schedule.get("risky").unwrap().start, 1);

        let est = PriorityScheduler::new(
            SchedulerConfig::default()
                .with_total_resources(1)
                .with_policy(SchedulingPolicy::EarliestStart),
        );
        let schedule = est.schedule_activities(activities).unwrap();
        assert_eq!(schedule.get("risky").unwrap().start, 0);
    }

    #[test]
    fn test_risk_balanced_pulls_heavy_forward() {
        let mut config = SchedulerConfig::default().with_total_resources(4);
        config.exposure_weight = 0.0;
        let schedule = PriorityScheduler::new(config)
            .schedule_activities(vec![make_activity("light", 1.0, 1), make_activity("heavy", 1.0, 4)])
            .unwrap();
        assert_eq!(schedule.get("heavy").unwrap().start, 0);
        assert_eq!(schedule.get("light").unwrap().start, 1);
    }

    #[test]
    fn test_hard_ceiling_staggers_risky_work() {
        let config = SchedulerConfig::default()
            .with_total_resources(10)
            .with_exposure_limits(0.4, 0.6);
        let schedule = PriorityScheduler::new(config)
            .schedule_activities(vec![
                make_activity("R1", 1.0, 1).with_exposure(RiskLevel::VeryHigh),
                make_activity("R2", 1.0, 1).with_exposure(RiskLevel::VeryHigh),
            ])
            .unwrap();
        // 0.5 + 0.5 > 0.6; the second waits until 0.5 * 0.9^k + 0.5 <= 0.6.
        let r1 = schedule.get("R1").unwrap().start;
        let r2 = schedule.get("R2").unwrap().start;
        assert_ne!(r1, r2);
        assert!(r1.max(r2) >= 16);
    }

    #[test]
    fn test_exposure_above_ceiling_is_unschedulable() {
        let config = SchedulerConfig::default().with_exposure_limits(0.1, 0.3);
        let result = PriorityScheduler::new(config)
            .schedule_activities(vec![make_activity("R", 1.0, 1).with_exposure(RiskLevel::VeryHigh)]);
        assert!(matches!(result, Err(Error::Unschedulable(id)) if id == "R"));
    }

    #[test]
    fn test_look_ahead_window() {
        let config = SchedulerConfig::default()
            .with_exposure_limits(0.4, 0.6)
            .with_max_deferral(3);
        let result = PriorityScheduler::new(config).schedule_activities(vec![
            make_activity("R1", 1.0, 1).with_exposure(RiskLevel::VeryHigh),
            make_activity("R2", 1.0, 1).with_exposure(RiskLevel::VeryHigh),
        ]);
        assert!(matches!(result, Err(Error::Unschedulable(id)) if id == "R2"));
    }

    #[test]
    fn test_long_queue_is_not_a_deferral() {
        let activities: Vec<Activity> = (0..400)
            .map(|i| make_activity(&format!("T{i}"), 1.0, 1))
            .collect();
        let schedule = scheduler(1).schedule_activities(activities).unwrap();
        assert_eq!(schedule.len(), 400);
        assert_eq!(schedule.makespan(), 400);
        assert!(schedule.violations(1).is_empty());
    }

    #[test]
    fn test_waiting_behind_long_activity() {
        let schedule = scheduler(1)
            .schedule_activities(vec![make_activity("long", 400.0, 1), make_activity("short", 1.0, 1)])
            .unwrap();
        assert_eq!(schedule.get("long").unwrap().start, 0);
        assert_eq!(schedule.get("short").unwrap().start, 400);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SchedulerConfig::default();
        config.exposure_decay_factor = 5.0;
        let result = PriorityScheduler::new(config)
            .schedule_activities(vec![make_activity("A", 2.0, 1)]);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    fn weights_config() -> SchedulerConfig {
        let mut config = SchedulerConfig::default().with_exposure_limits(0.5, 1.5);
        config.resource_weight = 2.0;
        config.exposure_weight = 10.0;
        config.exposure_weight_gain = 4.0;
        config.expected_project_duration = 10.0;
        config
    }

    #[test]
    fn test_resource_weight_falls_linearly() {
        let config = weights_config();
        let mut weights = Weights::initial(&config);
        for (unit, expected) in [(0, 2.0), (5, 1.0), (8, 0.4), (10, 0.0), (25, 0.0)] {
            weights.adapt(unit, 0.0, &config);
            assert!((weights.resource - expected).abs() < 1e-10, "unit {unit}");
        }

        let mut config = weights_config();
        config.expected_project_duration = 0.0;
        let mut weights = Weights::initial(&config);
        weights.adapt(0, 0.0, &config);
        assert_eq!(weights.resource, 0.0);
    }

    #[test]
    fn test_exposure_weight_grows_above_soft_threshold() {
        let config = weights_config();
        let mut weights = Weights::initial(&config);
        weights.adapt(0, 0.4, &config);
        assert_eq!(weights.exposure, 10.0);
        weights.adapt(1, 0.75, &config);
        // 10 + 4 * 0.25
        assert!((weights.exposure - 11.0).abs() < 1e-10);
        weights.adapt(2, 1.0, &config);
        assert!((weights.exposure - 13.0).abs() < 1e-10);
        weights.adapt(3, 0.2, &config);
        assert!((weights.exposure - 13.0).abs() < 1e-10);
    }

    #[test]
    fn test_soft_threshold_overshoot_reorders_work() {
        // "warmup" raises exposure before X and Y are released at unit 2.
        // X is resource-heavy and risky, Y light and safe.
        let network = || {
            vec![
                make_activity("warmup", 2.0, 3).with_exposure(RiskLevel::VeryHigh),
                make_activity("X", 1.0, 3)
                    .with_exposure(RiskLevel::VeryHigh)
                    .with_predecessor("warmup"),
                make_activity("Y", 1.0, 1)
                    .with_exposure(RiskLevel::VeryLow)
                    .with_predecessor("warmup"),
            ]
        };
        let config = |gain: f64| {
            let mut config = SchedulerConfig::default()
                .with_total_resources(3)
                .with_exposure_limits(0.1, 1.5);
            config.resource_weight = 1.0;
            config.exposure_weight = 1.0;
            config.exposure_weight_gain = gain;
            config.expected_project_duration = 1000.0;
            config
        };

        // Without gain: X scores 0.5 - 3 < Y's 0.05 - 1, so X goes first.
        let schedule = PriorityScheduler::new(config(0.0)).schedule_activities(network()).unwrap();
        assert_eq!(schedule.get("X").unwrap().start, 2);
        assert_eq!(schedule.get("Y").unwrap().start, 3);

        // With gain the exposure weight has grown past 4.5 by unit 2: Y goes first.
        let schedule = PriorityScheduler::new(config(100.0)).schedule_activities(network()).unwrap();
        assert_eq!(schedule.get("Y").unwrap().start, 2);
        assert_eq!(schedule.get("X").unwrap().start, 3);
    }

    #[test]
    fn test_successor_waits_for_latest_predecessor() {
        let schedule = scheduler(10)
            .schedule_activities(vec![
                make_activity("A", 2.0, 1),
                make_activity("B", 5.0, 1),
                make_activity("C", 1.0, 1).with_predecessor("A").with_predecessor("B"),
            ])
            .unwrap();
        assert_eq!(schedule.get("C").unwrap().start, 5);
    }

    #[test]
    fn test_custom_rule() {
        #[derive(Debug)]
        struct LongestFirst;
        impl PriorityRule for LongestFirst {
            fn name(&self) -> &'static str {
                "LPT"
            }
            fn evaluate(&self, activity: &Activity, _context: &PriorityContext) -> f64 {
                -activity.expected_duration()
            }
        }

        let schedule = scheduler(1)
            .with_rule(LongestFirst)
            .schedule_activities(vec![make_activity("short", 1.0, 1), make_activity("long", 4.0, 1)])
            .unwrap();
        assert_eq!(schedule.get("long").unwrap().start, 0);
        assert_eq!(schedule.get("short").unwrap().start, 4);

        let schedule = scheduler(1)
            .with_rule(rules::EarliestStart)
            .schedule_activities(vec![make_activity("short", 1.0, 1), make_activity("long", 4.0, 1)])
            .unwrap();
        assert_eq!(schedule.get("short").unwrap().start, 0);
    }
}
