//! Round lifecycle states.

use std::fmt;

/// Lifecycle state of one lobby's round.
///
/// - **Idle**: no game has been started yet.
/// - **Scheduled**: the sequence is drawn; waiting for the first reveal.
/// - **Revealing**: at least one item is live; more are coming.
/// - **Complete**: every item of the sequence has been revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Scheduled,
    Revealing,
    Complete,
}

impl RoundPhase {
    /// Returns `true` while a reveal chain is in flight.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Scheduled | Self::Revealing)
    }

    /// Returns `true` if a start request may begin a new sequence.
    pub fn accepts_start(self) -> bool {
        matches!(self, Self::Idle | Self::Complete)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Scheduled)
                | (Self::Scheduled, Self::Revealing)
                | (Self::Revealing, Self::Complete)
                | (Self::Complete, Self::Scheduled)
        )
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Scheduled => write!(f, "Scheduled"),
            Self::Revealing => write!(f, "Revealing"),
            Self::Complete => write!(f, "Complete"),
        }
    }
}
