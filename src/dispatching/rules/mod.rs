//! Built-in priority rules.
//!
//! - **RISK**: risk-balanced score `exposure × w_e − resources × w_r`
//! - **EST**: earliest feasible start (constant score)
//!
//! # Score Convention
//! All rules return lower scores for activities to place first.

use super::{PriorityContext, PriorityRule, RuleScore};
use crate::models::Activity;

/// Risk-balanced priority.
///
/// `score = exposure × exposure_weight − resources × resource_weight`
///
/// High-exposure activities score higher and are deferred; resource-hungry
/// activities score lower and are pulled forward while the resource
/// weight is still large.
#[derive(Debug, Clone, Copy)]
pub struct RiskBalanced;

impl PriorityRule for RiskBalanced {
    fn name(&self) -> &'static str {
        "RISK"
    }

    fn evaluate(&self, activity: &Activity, context: &PriorityContext) -> RuleScore {
        activity.exposure.value() * context.exposure_weight
            - activity.resources as f64 * context.resource_weight
    }

    fn description(&self) -> &'static str {
        "Risk-balanced priority"
    }
}

/// Earliest feasible start.
///
/// The degenerate case of [`RiskBalanced`] with both weights at zero:
/// every ready activity is tried as soon as it fits.
#[derive(Debug, Clone, Copy)]
pub struct EarliestStart;

impl PriorityRule for EarliestStart {
    fn name(&self) -> &'static str {
        "EST"
    }

    fn evaluate(&self, _activity: &Activity, _context: &PriorityContext) -> RuleScore {
        0.0
    }

    fn description(&self) -> &'static str {
        "Earliest Feasible Start"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    fn make_activity(id: &str, resources: u32, exposure: RiskLevel) -> Activity {
        Activity::new(id).with_resources(resources).with_exposure(exposure)
    }

    #[test]
    fn test_risk_defers_exposure() {
        let ctx = PriorityContext::at_unit(0).with_weights(0.0, 10.0);
        let risky = make_activity("risky", 1, RiskLevel::VeryHigh);
        let safe = make_activity("safe", 1, RiskLevel::VeryLow);
        assert!(RiskBalanced.evaluate(&safe, &ctx) < RiskBalanced.evaluate(&risky, &ctx));
    }

    #[test]
    fn test_risk_pulls_heavy_forward() {
        let ctx = PriorityContext::at_unit(0).with_weights(1.0, 0.0);
        let heavy = make_activity("heavy", 8, RiskLevel::Moderate);
        let light = make_activity("light", 1, RiskLevel::Moderate);
        assert!(RiskBalanced.evaluate(&heavy, &ctx) < RiskBalanced.evaluate(&light, &ctx));
    }

    #[test]
    fn test_risk_score_value() {
        let ctx = PriorityContext::at_unit(3).with_weights(0.5, 10.0);
        let a = make_activity("A", 4, RiskLevel::Moderate);
        // 0.20 * 10 - 4 * 0.5 = 0.0
        assert!(RiskBalanced.evaluate(&a, &ctx).abs() < 1e-10);
    }

    #[test]
    fn test_zero_weights_match_earliest_start() {
        let ctx = PriorityContext::at_unit(0);
        let a = make_activity("A", 5, RiskLevel::VeryHigh);
        assert_eq!(RiskBalanced.evaluate(&a, &ctx), EarliestStart.evaluate(&a, &ctx));
    }

    #[test]
    fn test_earliest_start_constant() {
        let ctx = PriorityContext::at_unit(7).with_weights(3.0, 3.0).with_exposure(2.0);
        let a = make_activity("A", 5, RiskLevel::VeryHigh);
        let b = make_activity("B", 1, RiskLevel::VeryLow);
        assert_eq!(EarliestStart.evaluate(&a, &ctx), EarliestStart.evaluate(&b, &ctx));
    }
}
