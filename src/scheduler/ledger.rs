//! Resource / cost / exposure ledger.
//!
//! One entry per time unit, grown lazily as activities are placed and
//! never shrunk. Each entry records:
//!
//! - headcount in use,
//! - cost accrued in that unit,
//! - exposure introduced in that unit (activities starting there).
//!
//! The ledger also carries a running exposure level that fades
//! multiplicatively at every unit boundary before new contributions are
//! added: `exposure(t) = exposure(t-1) × decay + introduced(t)`.
//!
//! Placement only ever happens at the ledger's current unit, so the
//! projected exposure of a future unit `u` is `exposure × decay^(u-t)`.

/// Bookkeeping for one time unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerEntry {
    /// Headcount in use.
    pub resources: u32,
    /// Cost accrued.
    pub cost: f64,
    /// Exposure introduced.
    pub exposure: f64,
}

/// Per-unit ledger owned by one scheduling run.
#[derive(Debug, Clone)]
pub struct Ledger {
    capacity: u32,
    decay_factor: f64,
    entries: Vec<LedgerEntry>,
    current_unit: u32,
    exposure: f64,
    peak_exposure: f64,
}

impl Ledger {
    /// Creates an empty ledger at unit 0.
    pub fn new(capacity: u32, decay_factor: f64) -> Self {
        Self {
            capacity,
            decay_factor,
            entries: Vec::new(),
            current_unit: 0,
            exposure: 0.0,
            peak_exposure: 0.0,
        }
    }

    /// Headcount capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Current unit.
    pub fn current_unit(&self) -> u32 {
        self.current_unit
    }

    /// Running exposure at the current unit.
    pub fn exposure(&self) -> f64 {
        self.exposure
    }

    /// Highest running exposure seen so far.
    pub fn peak_exposure(&self) -> f64 {
        self.peak_exposure
    }

    /// Moves the clock forward, decaying exposure once per boundary crossed.
    pub fn advance_to(&mut self, unit: u32) {
        while self.current_unit < unit {
            self.current_unit += 1;
            let introduced = self.entry(self.current_unit).exposure;
            self.exposure = self.exposure * self.decay_factor + introduced;
        }
    }

    /// Entry for `unit` (zeroed if never touched).
    pub fn entry(&self, unit: u32) -> LedgerEntry {
        self.entries.get(unit as usize).copied().unwrap_or_default()
    }

    /// Headcount in use at `unit`.
    pub fn resources_at(&self, unit: u32) -> u32 {
        self.entry(unit).resources
    }

    /// Projected running exposure at `unit >= current_unit`.
    pub fn projected_exposure(&self, unit: u32) -> f64 {
        let ahead = unit.saturating_sub(self.current_unit);
        self.exposure * self.decay_factor.powi(ahead as i32)
    }

    /// Whether an activity fits at the current unit.
    ///
    /// Every unit of `[current, current + duration)` must keep headcount
    /// within capacity and projected exposure within `ceiling`, counting
    /// the activity's own contribution decayed from its start.
    pub fn fits(&self, duration: u32, resources: u32, exposure: f64, ceiling: f64) -> bool {
        let start = self.current_unit;
        self.has_headcount(duration, resources)
            && (0..duration).all(|offset| {
                let own = exposure * self.decay_factor.powi(offset as i32);
                self.projected_exposure(start.saturating_add(offset)) + own
                    <= ceiling + f64::EPSILON
            })
    }

    /// Whether `resources` are free over `[current, current + duration)`,
    /// ignoring exposure.
    pub fn has_headcount(&self, duration: u32, resources: u32) -> bool {
        let start = self.current_unit;
        (0..duration).all(|offset| {
            self.resources_at(start.saturating_add(offset)) + resources <= self.capacity
        })
    }

    /// Books an activity at the current unit.
    pub fn place(&mut self, duration: u32, resources: u32, cost_per_unit: f64, exposure: f64) {
        let start = self.current_unit;
        let end = start.saturating_add(duration) as usize;
        if self.entries.len() < end {
            self.entries.resize(end, LedgerEntry::default());
        }
        for entry in &mut self.entries[start as usize..end] {
            entry.resources += resources;
            entry.cost += cost_per_unit;
        }
        if let Some(entry) = self.entries.get_mut(start as usize) {
            entry.exposure += exposure;
        }
        self.exposure += exposure;
        self.peak_exposure = self.peak_exposure.max(self.exposure);
    }

    /// Sum of accrued cost across all units.
    pub fn total_cost(&self) -> f64 {
        self.entries.iter().map(|e| e.cost).sum()
    }

    /// Number of units with entries.
    pub fn horizon(&self) -> u32 {
        self.entries.len() as u32
    }
}
