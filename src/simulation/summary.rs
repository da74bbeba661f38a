//! Aggregate statistics over a set of trials.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Failure rate | Unfinished trials / trials |
//! | Cost p50, p90 | Nearest-rank percentiles of final cost |
//! | Mean delay | Mean delay-days per trial |
//! | Blocking counts | How often each activity caused a deadlock |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SimulationResult;

/// Summary of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub trials: usize,
    pub finished: usize,
    /// Fraction of trials that did not finish (0.0..1.0).
    pub failure_rate: f64,
    pub mean_cost: f64,
    pub min_cost: f64,
    pub max_cost: f64,
    pub p50_cost: f64,
    pub p90_cost: f64,
    pub mean_elapsed: f64,
    pub p90_elapsed: u32,
    pub mean_delay_days: f64,
    pub mean_net_value: f64,
    /// Deadlock count per blocking activity.
    pub blocking_counts: BTreeMap<String, usize>,
}

impl SimulationSummary {
    /// Summarizes results in any order. Empty input gives all zeros.
    pub fn from_results(results: &[SimulationResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let n = results.len() as f64;

        let mut costs: Vec<f64> = results.iter().map(|r| r.final_cost).collect();
        costs.sort_by(f64::total_cmp);
        let mut elapsed: Vec<u32> = results.iter().map(|r| r.elapsed_time).collect();
        elapsed.sort_unstable();

        let mut blocking_counts = BTreeMap::new();
        for id in results.iter().filter_map(|r| r.blocking_activity.as_ref()) {
            *blocking_counts.entry(id.clone()).or_insert(0) += 1;
        }

        let finished = results.iter().filter(|r| r.project_finished).count();
        Self {
            trials: results.len(),
            finished,
            failure_rate: (results.len() - finished) as f64 / n,
            mean_cost: costs.iter().sum::<f64>() / n,
            min_cost: costs[0],
            max_cost: costs[costs.len() - 1],
            p50_cost: costs[nearest_rank(costs.len(), 0.5)],
            p90_cost: costs[nearest_rank(costs.len(), 0.9)],
            mean_elapsed: elapsed.iter().map(|&e| e as f64).sum::<f64>() / n,
            p90_elapsed: elapsed[nearest_rank(elapsed.len(), 0.9)],
            mean_delay_days: results.iter().map(|r| r.total_delay_days).sum::<f64>() / n,
            mean_net_value: results.iter().map(|r| r.net_value).sum::<f64>() / n,
            blocking_counts,
        }
    }

    /// The activity that blocked most often.
    pub fn most_frequent_blocker(&self) -> Option<(&str, usize)> {
        self.blocking_counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(id, &count)| (id.as_str(), count))
    }
}

fn nearest_rank(len: usize, quantile: f64) -> usize {
    let rank = (quantile * len as f64).ceil() as usize;
    rank.clamp(1, len) - 1
}
