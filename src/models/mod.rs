//! Project scheduling domain models.
//!
//! Provides the data types shared by the scheduler and the simulator.
//!
//! | Type | Role |
//! |------|------|
//! | [`Activity`] | Work template: estimate, headcount, cost rate, risks |
//! | [`ActivityRecord`] | Raw ingestion row, converted with `TryFrom` |
//! | [`RiskLevel`] | 1–5 risk grade and its lookup value |
//! | [`Schedule`] | Time-phased placement of every activity |

mod activity;
mod record;
mod risk;
mod schedule;

pub use activity::{Activity, CostBasis};
pub use record::{activities_from_records, parse_predecessors, ActivityRecord, NO_PREDECESSORS};
pub use risk::{InvalidRiskLevel, RiskLevel};
pub use schedule::{Schedule, ScheduledActivity, Violation, ViolationType};
