//! Monte Carlo robustness evaluation of a schedule.
//!
//! A finished [`Schedule`](crate::models::Schedule) is replayed many times
//! under stochastic delay and attrition. Completions raise the chance of
//! further events in proportion to the global exposure at that moment, and
//! attrition permanently shrinks the resource pool, which can leave a
//! trial deadlocked.
//!
//! Trials are independent and seeded per trial, so [`MonteCarloSimulator::run`]
//! is reproducible regardless of thread count.

mod decay;
mod engine;
mod result;
mod sink;
mod state;
mod summary;

pub use decay::ExposureDecay;
pub use engine::MonteCarloSimulator;
pub use result::{RiskEvent, RiskEventKind, SimulationResult};
pub use sink::{CollectingSink, JsonArrayWriter, ResultSink};
pub use state::{ActivityStatus, SimulationState};
pub use summary::SimulationSummary;
