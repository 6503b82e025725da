//! Per-lobby round state.

use rand::Rng;
use tracing::{debug, info};

use crate::{RevealTimer, RoundError, RoundPhase, draw_sequence};

/// What a successful start produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPlan {
    /// Identifies this sequence. Timer messages carrying an older epoch
    /// are stale and ignored.
    pub epoch: u64,
    /// Number of items that will be revealed.
    pub length: usize,
}

/// One reveal handed back to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal<T> {
    pub item: T,
    /// 1-based position in the sequence.
    pub index: usize,
    pub length: usize,
}

impl<T> Reveal<T> {
    /// Returns `true` for the final reveal of the sequence.
    pub fn is_last(&self) -> bool {
        self.index == self.length
    }
}

/// Round state for one lobby: the phase, the fixed reveal sequence, and
/// the timer driving it.
///
/// The sequence is fixed when the round is scheduled; later growth of the
/// pool does not affect it.
#[derive(Debug)]
pub struct Round<T> {
    phase: RoundPhase,
    sequence: Vec<T>,
    revealed: usize,
    epoch: u64,
    timer: Option<RevealTimer>,
}

impl<T> Default for Round<T> {
    fn default() -> Self {
        Self {
            phase: RoundPhase::Idle,
            sequence: Vec::new(),
            revealed: 0,
            epoch: 0,
            timer: None,
        }
    }
}

impl<T: Clone> Round<T> {
    /// Creates an idle round.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The fixed reveal sequence of the current (or last) game.
    pub fn sequence(&self) -> &[T] {
        &self.sequence
    }

    /// How many items of the sequence have been revealed so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Returns `true` while a timer is attached.
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Moves `Idle`/`Complete → Scheduled` and draws the reveal sequence.
    ///
    /// # Errors
    /// - [`RoundError::AlreadyRunning`] while `Scheduled` or `Revealing`;
    ///   repeated start requests never spawn a second chain.
    /// - [`RoundError::InvalidCapacity`] if `capacity` is zero.
    /// - [`RoundError::InsufficientPool`] if the pool is empty or smaller
    ///   than `capacity`.
    pub fn schedule<R>(
        &mut self,
        pool: &[T],
        capacity: usize,
        rng: &mut R,
    ) -> Result<RoundPlan, RoundError>
    where
        R: Rng + ?Sized,
    {
        if !self.phase.accepts_start() {
            return Err(RoundError::AlreadyRunning(self.phase));
        }
        if capacity == 0 {
            return Err(RoundError::InvalidCapacity(capacity));
        }
        if pool.is_empty() || pool.len() < capacity {
            return Err(RoundError::InsufficientPool {
                pool: pool.len(),
                capacity,
            });
        }

        self.sequence = draw_sequence(pool, capacity, rng);
        self.revealed = 0;
        self.epoch += 1;
        self.timer = None;
        self.transition(RoundPhase::Scheduled);
        info!(
            epoch = self.epoch,
            length = self.sequence.len(),
            "round scheduled"
        );

        Ok(RoundPlan {
            epoch: self.epoch,
            length: self.sequence.len(),
        })
    }

    /// Attaches the timer that drives this round. Ignored (and the timer
    /// dropped) if the round is not running.
    pub fn arm(&mut self, timer: RevealTimer) {
        if self.phase.is_running() {
            self.timer = Some(timer);
        } else {
            debug!(phase = %self.phase, "arm on a round that is not running");
        }
    }

    /// Reveals the next item of the sequence.
    ///
    /// Returns `None` for a stale firing: wrong epoch, or the round is not
    /// running. After the last item the round is `Complete` and its timer
    /// is released.
    pub fn reveal_next(&mut self, epoch: u64) -> Option<Reveal<T>> {
        if epoch != self.epoch || !self.phase.is_running() {
            debug!(
                epoch,
                current = self.epoch,
                phase = %self.phase,
                "stale reveal ignored"
            );
            return None;
        }

        let item = self.sequence.get(self.revealed)?.clone();
        self.revealed += 1;
        let length = self.sequence.len();

        if self.phase == RoundPhase::Scheduled {
            self.transition(RoundPhase::Revealing);
        }
        if self.revealed == length {
            self.transition(RoundPhase::Complete);
            self.timer = None;
            info!(epoch, length, "round complete");
        }

        Some(Reveal {
            item,
            index: self.revealed,
            length,
        })
    }

    fn transition(&mut self, target: RoundPhase) {
        debug_assert!(
            self.phase.can_transition_to(target),
            "illegal round transition {} -> {target}",
            self.phase
        );
        self.phase = target;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_schedule_idle_round_enters_scheduled() {
        let mut round = Round::new();

        let plan = round.schedule(&["a", "b", "c"], 2, &mut rng()).unwrap();

        assert_eq!(round.phase(), RoundPhase::Scheduled);
        assert_eq!(plan, RoundPlan { epoch: 1, length: 2 });
        assert_eq!(round.sequence().len(), 2);
    }

    #[test]
    fn test_schedule_pool_smaller_than_capacity_stays_idle() {
        let mut round = Round::new();

        let result = round.schedule(&["a"], 2, &mut rng());

        assert!(matches!(
            result,
            Err(RoundError::InsufficientPool { pool: 1, capacity: 2 })
        ));
        assert_eq!(round.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_schedule_empty_pool_is_rejected() {
        let mut round: Round<&str> = Round::new();

        let result = round.schedule(&[], 1, &mut rng());

        assert!(matches!(result, Err(RoundError::InsufficientPool { .. })));
    }

    #[test]
    fn test_schedule_zero_capacity_is_rejected() {
        let mut round = Round::new();

        let result = round.schedule(&["a"], 0, &mut rng());

        assert!(matches!(result, Err(RoundError::InvalidCapacity(0))));
    }

    #[test]
    fn test_schedule_while_running_is_rejected_and_keeps_sequence() {
        let mut round = Round::new();
        round.schedule(&["a", "b", "c"], 3, &mut rng()).unwrap();
        let before = round.sequence().to_vec();

        let again = round.schedule(&["a", "b", "c"], 3, &mut StdRng::seed_from_u64(9));

        assert!(matches!(
            again,
            Err(RoundError::AlreadyRunning(RoundPhase::Scheduled))
        ));
        assert_eq!(round.sequence(), before.as_slice());
        assert_eq!(round.epoch(), 1);
    }

    #[test]
    fn test_reveal_next_walks_sequence_then_completes() {
        let mut round = Round::new();
        let plan = round.schedule(&["a", "b"], 2, &mut rng()).unwrap();
        let expected = round.sequence().to_vec();

        let first = round.reveal_next(plan.epoch).unwrap();
        assert_eq!(round.phase(), RoundPhase::Revealing);
        assert_eq!((first.item, first.index, first.length), (expected[0], 1, 2));
        assert!(!first.is_last());

        let second = round.reveal_next(plan.epoch).unwrap();
        assert_eq!((second.item, second.index), (expected[1], 2));
        assert!(second.is_last());
        assert_eq!(round.phase(), RoundPhase::Complete);

        assert!(round.reveal_next(plan.epoch).is_none());
    }

    #[test]
    fn test_reveal_next_with_stale_epoch_is_ignored() {
        let mut round = Round::new();
        let first = round.schedule(&["a"], 1, &mut rng()).unwrap();
        round.reveal_next(first.epoch).unwrap();
        let second = round.schedule(&["a"], 1, &mut rng()).unwrap();

        assert!(round.reveal_next(first.epoch).is_none());
        assert_eq!(round.phase(), RoundPhase::Scheduled);
        assert!(round.reveal_next(second.epoch).is_some());
    }

    #[test]
    fn test_schedule_after_complete_starts_new_epoch() {
        let mut round = Round::new();
        let first = round.schedule(&["a", "b"], 1, &mut rng()).unwrap();
        round.reveal_next(first.epoch).unwrap();
        assert_eq!(round.phase(), RoundPhase::Complete);

        let second = round.schedule(&["a", "b"], 2, &mut rng()).unwrap();

        assert_eq!(second.epoch, first.epoch + 1);
        assert_eq!(round.revealed(), 0);
    }
}
