//! Risk-aware resource-constrained project scheduling.
//!
//! Builds a time-phased plan for a network of activities that share a
//! limited headcount pool, trading cost against accumulated risk exposure,
//! then stress-tests the plan with Monte Carlo replay under stochastic
//! delay and staff attrition.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Activity`, `ActivityRecord`, `RiskLevel`,
//!   `Schedule`
//! - **`estimation`**: Three-point (PERT) duration estimates
//! - **`graph`**: Activity dependency DAG with cycle detection
//! - **`dispatching`**: Priority rules that order ready activities
//! - **`scheduler`**: Priority scheduler, resource/exposure ledger, KPIs
//! - **`simulation`**: Monte Carlo simulator, result sinks, summaries
//! - **`config`**: Serde-backed scheduler and simulator settings
//!
//! # Example
//!
//! ```
//! use risk_schedule::config::{SchedulerConfig, SimulationConfig};
//! use risk_schedule::estimation::ThreePointEstimate;
//! use risk_schedule::graph::ActivityGraph;
//! use risk_schedule::models::{Activity, RiskLevel};
//! use risk_schedule::scheduler::PriorityScheduler;
//! use risk_schedule::simulation::{MonteCarloSimulator, SimulationSummary};
//!
//! let design = Activity::new("design")
//!     .with_estimate(ThreePointEstimate::new(2.0, 3.0, 6.0).unwrap())
//!     .with_resources(2)
//!     .with_cost_rate(100.0)
//!     .with_delay_risk(RiskLevel::Moderate, 2.0);
//! let build = Activity::new("build")
//!     .with_estimate(ThreePointEstimate::new(4.0, 5.0, 9.0).unwrap())
//!     .with_resources(3)
//!     .with_cost_rate(100.0)
//!     .with_exposure(RiskLevel::High)
//!     .with_predecessor("design");
//!
//! let graph = ActivityGraph::from_activities([design, build]).unwrap();
//! let schedule = PriorityScheduler::new(SchedulerConfig::default().with_total_resources(4))
//!     .schedule(&graph)
//!     .unwrap();
//! assert_eq!(schedule.get("build").unwrap().start, schedule.get("design").unwrap().end);
//!
//! let config = SimulationConfig::default().with_total_resources(4).with_trials(50);
//! let results = MonteCarloSimulator::new(schedule, config).unwrap().run();
//! let summary = SimulationSummary::from_results(&results);
//! assert_eq!(summary.trials, 50);
//! ```
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Malcolm et al. (1959), "Application of a Technique for Research and
//!   Development Program Evaluation"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod estimation;
pub mod graph;
pub mod models;
pub mod scheduler;
pub mod simulation;

pub use error::{Error, Result};
