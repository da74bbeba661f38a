use std::collections::BTreeSet;

use proptest::prelude::*;
use risk_schedule::config::{SchedulerConfig, SimulationConfig};
use risk_schedule::estimation::ThreePointEstimate;
use risk_schedule::models::{Activity, RiskLevel, Schedule};
use risk_schedule::scheduler::PriorityScheduler;
use risk_schedule::simulation::{MonteCarloSimulator, RiskEventKind};

const CAPACITY: u32 = 6;

/// (resources, duration, delay grade, attrition grade, predecessor mask)
type Spec = (u32, u32, u8, u8, Vec<bool>);

fn network() -> impl Strategy<Value = Vec<Spec>> {
    prop::collection::vec(
        (
            1u32..=3,
            1u32..=4,
            1u8..=5,
            1u8..=5,
            prop::collection::vec(any::<bool>(), 8),
        ),
        1..8,
    )
}

fn planned(specs: &[Spec]) -> Schedule {
    let activities = specs.iter().enumerate().map(|(i, (res, dur, delay, attr, mask))| {
        let mut activity = Activity::new(format!("T{i}"))
            .with_estimate(ThreePointEstimate::fixed(*dur as f64).unwrap())
            .with_resources(*res)
            .with_cost_rate(20.0)
            .with_delay_risk(RiskLevel::try_from(*delay).unwrap(), 1.5)
            .with_attrition_risk(RiskLevel::try_from(*attr).unwrap(), 1)
            .with_exposure(RiskLevel::Low);
        for (j, _) in mask.iter().enumerate().take(i).filter(|(_, &on)| on) {
            activity = activity.with_predecessor(format!("T{j}"));
        }
        activity
    });
    PriorityScheduler::new(SchedulerConfig::default().with_total_resources(CAPACITY))
        .schedule_activities(activities)
        .unwrap()
}

fn simulator(schedule: Schedule, seed: u64) -> MonteCarloSimulator {
    let config = SimulationConfig::default()
        .with_total_resources(CAPACITY)
        .with_daily_overhead(10.0)
        .with_trials(16)
        .with_seed(seed);
    MonteCarloSimulator::new(schedule, config).unwrap()
}

proptest! {
    #[test]
    fn same_seed_same_results(specs in network(), seed in any::<u32>()) {
        let schedule = planned(&specs);
        let first = simulator(schedule.clone(), seed as u64).run();
        let second = simulator(schedule, seed as u64).run();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_activity_is_accounted_for(specs in network(), seed in any::<u32>()) {
        let schedule = planned(&specs);
        let all: BTreeSet<String> = schedule.activities.iter().map(|a| a.id().to_string()).collect();

        for r in simulator(schedule, seed as u64).run() {
            let finished: BTreeSet<String> = r.finished_activities.iter().cloned().collect();
            let unfinished: BTreeSet<String> = r.unfinished_activities.iter().cloned().collect();
            prop_assert!(finished.is_disjoint(&unfinished));
            prop_assert_eq!(finished.union(&unfinished).cloned().collect::<BTreeSet<_>>(), all.clone());
            prop_assert_eq!(r.project_finished, unfinished.is_empty());
            prop_assert_eq!(r.project_finished, r.blocking_activity.is_none());
        }
    }

    #[test]
    fn outcomes_stay_in_range(specs in network(), seed in any::<u32>()) {
        let schedule = planned(&specs);
        let makespan = schedule.makespan();
        let sim = simulator(schedule, seed as u64);
        let reward = sim.config().completion_reward;

        for r in sim.run() {
            prop_assert!(r.final_cost >= 0.0);
            prop_assert!(r.resources_remaining <= CAPACITY);
            prop_assert!((r.net_value - (reward - r.final_cost)).abs() < 1e-6);
            let delays: f64 = r.events_of(RiskEventKind::Delay).map(|e| e.magnitude).sum();
            prop_assert!((r.total_delay_days - delays).abs() < 1e-9);
            if r.project_finished {
                prop_assert!(r.elapsed_time >= makespan);
            }
            for e in &r.events {
                prop_assert!(e.exposure >= 0.0);
                prop_assert!(e.time <= r.elapsed_time);
            }
        }
    }
}
