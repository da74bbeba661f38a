//! Error type shared by ingestion, graph construction, scheduling and
//! result output.
//!
//! A blocked simulation trial is not an error: it is recorded in
//! [`SimulationResult`](crate::simulation::SimulationResult).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the scheduling core.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw ingestion record is missing a field or carries a non-numeric value.
    #[error("invalid activity record '{record}': {reason}")]
    InvalidActivityRecord { record: String, reason: String },

    /// Three-point estimate is non-finite, non-positive or out of order.
    #[error("invalid estimate (optimistic={optimistic}, likely={likely}, pessimistic={pessimistic})")]
    InvalidEstimate {
        optimistic: f64,
        likely: f64,
        pessimistic: f64,
    },

    /// Two activities share an identifier.
    #[error("duplicate activity identifier: {0}")]
    DuplicateIdentifier(String),

    /// A dependency refers to an activity that is not in the graph.
    #[error("unknown activity: {0}")]
    UnknownActivity(String),

    /// The predecessor relation is not a DAG.
    #[error("circular dependency detected involving activity '{0}'")]
    CyclicDependency(String),

    /// An activity cannot be placed within the look-ahead window.
    #[error("activity '{0}' cannot be scheduled within the look-ahead window")]
    Unschedulable(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// The result writer failed or panicked.
    #[error("result sink failed: {0}")]
    Sink(String),
}
