//! Priority rules for ready activities.
//!
//! Each time unit the scheduler scores every ready activity with a
//! [`PriorityRule`] and attempts placement in ascending score order.
//!
//! # Usage
//!
//! ```
//! use risk_schedule::dispatching::{PriorityContext, PriorityRule, rules};
//! use risk_schedule::models::{Activity, RiskLevel};
//!
//! let ctx = PriorityContext::at_unit(0).with_weights(1.0, 10.0);
//! let risky = Activity::new("risky").with_exposure(RiskLevel::VeryHigh);
//! let safe = Activity::new("safe").with_exposure(RiskLevel::VeryLow);
//!
//! // Risky work is deferred.
//! assert!(rules::RiskBalanced.evaluate(&safe, &ctx) < rules::RiskBalanced.evaluate(&risky, &ctx));
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"

mod context;
pub mod rules;

pub use context::PriorityContext;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

use crate::models::Activity;

/// Score returned by a priority rule.
///
/// Lower scores = higher priority (placed first).
pub type RuleScore = f64;

/// A rule that orders ready activities.
///
/// # Score Convention
/// **Lower score = higher priority.** Ties are broken by insertion order
/// in the scheduler.
pub trait PriorityRule: Send + Sync + Debug {
    /// Rule name (e.g., "RISK").
    fn name(&self) -> &'static str;

    /// Scores an activity in the current scheduling context.
    fn evaluate(&self, activity: &Activity, context: &PriorityContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Configurable choice of built-in rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// Exposure deferred, resource-heavy work pulled forward.
    #[default]
    RiskBalanced,
    /// Every ready activity scores equally; insertion order decides.
    EarliestStart,
}

impl SchedulingPolicy {
    /// The rule implementing this policy.
    pub fn rule(self) -> Arc<dyn PriorityRule> {
        match self {
            Self::RiskBalanced => Arc::new(rules::RiskBalanced),
            Self::EarliestStart => Arc::new(rules::EarliestStart),
        }
    }
}
