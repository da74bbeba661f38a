//! Scheduling context for priority rule evaluation.

/// Runtime scheduler state passed to priority rules.
///
/// Holds the current time unit, the ledger's running exposure and the
/// adaptive weights in effect for this unit.
#[derive(Debug, Clone, Default)]
pub struct PriorityContext {
    /// Current time unit.
    pub current_unit: u32,
    /// Running exposure from the ledger.
    pub exposure: f64,
    /// Weight on headcount (pulls resource-hungry work forward).
    pub resource_weight: f64,
    /// Weight on exposure (pushes risky work back).
    pub exposure_weight: f64,
}

impl PriorityContext {
    /// Creates a context at the given unit with zero weights.
    pub fn at_unit(current_unit: u32) -> Self {
        Self {
            current_unit,
            ..Default::default()
        }
    }

    /// Sets both weights.
    pub fn with_weights(mut self, resource_weight: f64, exposure_weight: f64) -> Self {
        self.resource_weight = resource_weight;
        self.exposure_weight = exposure_weight;
        self
    }

    /// Sets the running exposure.
    pub fn with_exposure(mut self, exposure: f64) -> Self {
        self.exposure = exposure;
        self
    }
}
