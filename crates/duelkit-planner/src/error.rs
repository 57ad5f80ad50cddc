//! Error types for the avoidance planner.

use thiserror::Error;

/// Errors that abort a rewrite run. None of these are recoverable: once
/// one is raised, no partial output is considered valid.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A move was resolved while no toolhead was active.
    #[error("No active toolhead while resolving a move")]
    NoActiveToolhead,

    /// Maintenance motion was marked twice without an intervening
    /// feed-rate restore. Indicates a planner bookkeeping bug.
    #[error("Feed-rate restore already pending; maintenance motion marked twice")]
    FeedRestorePending,

    /// The input stream could not be classified.
    #[error(transparent)]
    Gcode(#[from] duelkit_core::Error),

    /// The output sink failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using [`PlannerError`].
pub type PlannerResult<T> = std::result::Result<T, PlannerError>;
