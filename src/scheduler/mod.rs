//! Priority scheduler, its ledger, and schedule KPIs.
//!
//! # Algorithm
//!
//! `PriorityScheduler` walks time units from 0, placing ready activities
//! in priority order wherever headcount and the exposure ceiling allow.
//! It is a heuristic, not an exact solver.
//!
//! # KPI
//!
//! `ScheduleKpi` reports makespan, cost split, utilization and exposure.
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4

mod kpi;
mod ledger;
mod priority;

pub use kpi::ScheduleKpi;
pub use ledger::{Ledger, LedgerEntry};
pub use priority::PriorityScheduler;
