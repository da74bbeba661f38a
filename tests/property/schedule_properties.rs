use proptest::prelude::*;
use risk_schedule::config::SchedulerConfig;
use risk_schedule::dispatching::SchedulingPolicy;
use risk_schedule::estimation::ThreePointEstimate;
use risk_schedule::models::{Activity, RiskLevel};
use risk_schedule::scheduler::{PriorityScheduler, ScheduleKpi};

const CAPACITY: u32 = 4;

/// (resources, duration, exposure grade, predecessor mask)
type Spec = (u32, u32, u8, Vec<bool>);

fn network() -> impl Strategy<Value = Vec<Spec>> {
    prop::collection::vec(
        (
            1u32..=CAPACITY,
            1u32..=5,
            1u8..=5,
            prop::collection::vec(any::<bool>(), 12),
        ),
        1..12,
    )
}

fn build(specs: &[Spec]) -> Vec<Activity> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (resources, duration, grade, mask))| {
            let mut activity = Activity::new(format!("T{i}"))
                .with_estimate(ThreePointEstimate::fixed(*duration as f64).unwrap())
                .with_resources(*resources)
                .with_cost_rate(5.0)
                .with_exposure(RiskLevel::try_from(*grade).unwrap());
            for (j, _) in mask.iter().enumerate().take(i).filter(|(_, &on)| on) {
                activity = activity.with_predecessor(format!("T{j}"));
            }
            activity
        })
        .collect()
}

fn config(policy: SchedulingPolicy) -> SchedulerConfig {
    SchedulerConfig::default()
        .with_total_resources(CAPACITY)
        .with_daily_overhead(50.0)
        .with_policy(policy)
}

proptest! {
    #[test]
    fn schedule_respects_precedence_and_capacity(specs in network()) {
        let activities = build(&specs);
        let schedule = PriorityScheduler::new(config(SchedulingPolicy::RiskBalanced))
            .schedule_activities(activities.clone())
            .unwrap();

        prop_assert_eq!(schedule.len(), activities.len());
        let violations = schedule.violations(CAPACITY);
        prop_assert!(violations.is_empty(), "violations: {:?}", violations);
    }

    #[test]
    fn durations_follow_estimates(specs in network()) {
        let activities = build(&specs);
        let schedule = PriorityScheduler::new(config(SchedulingPolicy::EarliestStart))
            .schedule_activities(activities.clone())
            .unwrap();

        for activity in &activities {
            let placed = schedule.get(&activity.id).unwrap();
            prop_assert_eq!(placed.duration(), activity.duration_units());
        }
    }

    #[test]
    fn total_cost_is_overhead_plus_activity_cost(specs in network()) {
        let config = config(SchedulingPolicy::RiskBalanced);
        let schedule = PriorityScheduler::new(config.clone())
            .schedule_activities(build(&specs))
            .unwrap();

        let kpi = ScheduleKpi::calculate(&schedule, &config);
        prop_assert!((schedule.total_cost - kpi.total_cost()).abs() < 1e-6);
        prop_assert!(kpi.peak_resource_usage <= CAPACITY);
    }

    #[test]
    fn scheduling_is_deterministic(specs in network()) {
        let scheduler = PriorityScheduler::new(config(SchedulingPolicy::RiskBalanced));
        let first = scheduler.schedule_activities(build(&specs)).unwrap();
        let second = scheduler.schedule_activities(build(&specs)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn expected_duration_lies_within_bounds(
        o in 0.1f64..50.0,
        dm in 0.0f64..50.0,
        dp in 0.0f64..50.0,
    ) {
        let estimate = ThreePointEstimate::new(o, o + dm, o + dm + dp).unwrap();
        let expected = estimate.expected();
        prop_assert!(estimate.optimistic() <= expected + 1e-9);
        prop_assert!(expected <= estimate.pessimistic() + 1e-9);
        prop_assert!(estimate.standard_deviation() >= 0.0);
        prop_assert!(estimate.duration_units() >= 1);
        prop_assert!(estimate.duration_units() as f64 >= expected - 1e-9);
    }
}
