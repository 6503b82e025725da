//! Reveal rounds for the anime quiz server.
//!
//! A round draws a random reveal sequence from a lobby's item pool and
//! then reveals one item at a time: the first after
//! [`RevealConfig::initial_delay`], each following one after
//! [`RevealConfig::cadence`].
//!
//! ```text
//! Idle ──start──→ Scheduled ──first reveal──→ Revealing ──last reveal──→ Complete
//!                                                                          │
//!   ↑ start again (new epoch) ─────────────────────────────────────────────┘
//! ```
//!
//! # Integration
//!
//! [`Round`] is pure state. The [`RevealTimer`] is the only thing that
//! touches the clock; it pushes one message per reveal into the owner's
//! queue, and the owner feeds it back to [`Round::reveal_next`]:
//!
//! ```ignore
//! let plan = round.schedule(&pool, capacity, &mut rand::rng())?;
//! round.arm(RevealTimer::spawn(&config, plan.length, tx, Tick { lobby, epoch: plan.epoch }));
//!
//! // later, in the owner's event loop:
//! Tick { lobby, epoch } => if let Some(reveal) = round.reveal_next(epoch) { /* broadcast */ }
//! ```
//!
//! Dropping a [`Round`] drops its timer, which aborts the timer task.

mod error;
mod phase;
mod round;
mod sequence;
mod timer;

pub use error::RoundError;
pub use phase::RoundPhase;
pub use round::{Reveal, Round, RoundPlan};
pub use sequence::draw_sequence;
pub use timer::RevealTimer;

use std::time::Duration;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing of the reveal chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealConfig {
    /// Delay between the start request and the first reveal.
    pub initial_delay: Duration,
    /// Delay between consecutive reveals.
    pub cadence: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(10),
            cadence: Duration::from_secs(30),
        }
    }
}

impl RevealConfig {
    /// Smallest cadence accepted; a zero cadence would dump the whole
    /// sequence at once.
    pub const MIN_CADENCE: Duration = Duration::from_millis(1);

    /// Largest delay or cadence accepted. Longer values are clamped so
    /// deadlines always fit the clock.
    pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

    /// Builds a config from whole seconds.
    pub fn from_secs(initial_delay: u64, cadence: u64) -> Self {
        Self {
            initial_delay: Duration::from_secs(initial_delay),
            cadence: Duration::from_secs(cadence),
        }
    }

    /// Clamps out-of-range values. Called by [`RevealTimer::spawn`].
    pub fn validated(mut self) -> Self {
        if self.cadence < Self::MIN_CADENCE {
            tracing::warn!(
                cadence_ms = self.cadence.as_millis() as u64,
                "reveal cadence below minimum, clamping"
            );
            self.cadence = Self::MIN_CADENCE;
        }
        if self.cadence > Self::MAX_DELAY {
            tracing::warn!(
                cadence_secs = self.cadence.as_secs(),
                "reveal cadence above maximum, clamping"
            );
            self.cadence = Self::MAX_DELAY;
        }
        if self.initial_delay > Self::MAX_DELAY {
            tracing::warn!(
                delay_secs = self.initial_delay.as_secs(),
                "reveal delay above maximum, clamping"
            );
            self.initial_delay = Self::MAX_DELAY;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions_follow_reveal_order() {
        assert!(RoundPhase::Idle.can_transition_to(RoundPhase::Scheduled));
        assert!(RoundPhase::Scheduled.can_transition_to(RoundPhase::Revealing));
        assert!(RoundPhase::Revealing.can_transition_to(RoundPhase::Complete));
        assert!(RoundPhase::Complete.can_transition_to(RoundPhase::Scheduled));

        assert!(!RoundPhase::Idle.can_transition_to(RoundPhase::Revealing));
        assert!(!RoundPhase::Scheduled.can_transition_to(RoundPhase::Scheduled));
        assert!(!RoundPhase::Revealing.can_transition_to(RoundPhase::Scheduled));
    }

    #[test]
    fn test_phase_running_and_start_acceptance_are_disjoint() {
        for phase in [
            RoundPhase::Idle,
            RoundPhase::Scheduled,
            RoundPhase::Revealing,
            RoundPhase::Complete,
        ] {
            assert_ne!(phase.is_running(), phase.accepts_start(), "{phase}");
        }
    }

    #[test]
    fn test_reveal_config_default_is_ten_then_thirty_seconds() {
        let config = RevealConfig::default();
        assert_eq!(config.initial_delay, Duration::from_secs(10));
        assert_eq!(config.cadence, Duration::from_secs(30));
    }

    #[test]
    fn test_reveal_config_validated_clamps_zero_cadence() {
        let config = RevealConfig::from_secs(0, 0).validated();
        assert_eq!(config.cadence, RevealConfig::MIN_CADENCE);
        assert_eq!(config.initial_delay, Duration::ZERO);
    }

    #[test]
    fn test_reveal_config_validated_clamps_huge_values() {
        let config = RevealConfig::from_secs(u64::MAX, u64::MAX).validated();
        assert_eq!(config.initial_delay, RevealConfig::MAX_DELAY);
        assert_eq!(config.cadence, RevealConfig::MAX_DELAY);
    }
}
