//! Error types for the round layer.

use crate::RoundPhase;

/// Reasons a start request is refused.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    /// A reveal chain is already in flight.
    #[error("round already running (phase {0})")]
    AlreadyRunning(RoundPhase),

    /// The pool cannot fill a sequence of the requested length.
    #[error("pool of {pool} items cannot fill {capacity} reveals")]
    InsufficientPool { pool: usize, capacity: usize },

    /// A sequence length of zero was requested.
    #[error("reveal count must be at least 1, got {0}")]
    InvalidCapacity(usize),
}
