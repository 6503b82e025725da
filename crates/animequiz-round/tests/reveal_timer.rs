//! Integration tests for the reveal timer and its use by a round.
//!
//! Uses `start_paused = true` so Tokio's clock auto-advances: every
//! `sleep_until` resolves as soon as the runtime is otherwise idle, and
//! elapsed times are exact.

use std::time::Duration;

use animequiz_round::{RevealConfig, RevealTimer, Round, RoundPhase};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
struct Tick {
    epoch: u64,
}

// =========================================================================
// Timing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_timer_fires_after_delay_then_on_cadence() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let start = Instant::now();
    let _timer = RevealTimer::spawn(&RevealConfig::default(), 3, tx, Tick { epoch: 1 });

    let mut fired_at = Vec::new();
    while let Some(tick) = rx.recv().await {
        assert_eq!(tick, Tick { epoch: 1 });
        fired_at.push(start.elapsed());
    }

    assert_eq!(
        fired_at,
        vec![
            Duration::from_secs(10),
            Duration::from_secs(40),
            Duration::from_secs(70),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_timer_nothing_before_initial_delay() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _timer = RevealTimer::spawn(&RevealConfig::default(), 1, tx, Tick { epoch: 1 });

    let early = tokio::time::timeout(Duration::from_secs(9), rx.recv()).await;
    assert!(early.is_err(), "no reveal before the initial delay");

    let on_time = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
    assert_eq!(on_time.unwrap(), Some(Tick { epoch: 1 }));
}

#[tokio::test(start_paused = true)]
async fn test_timer_zero_reveals_sends_nothing() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Tick>();
    let timer = RevealTimer::spawn(&RevealConfig::default(), 0, tx, Tick { epoch: 1 });

    assert_eq!(rx.recv().await, None);
    assert!(timer.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_timer_huge_delay_is_clamped_and_still_fires() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let start = Instant::now();
    let config = RevealConfig::from_secs(u64::MAX, u64::MAX);
    let _timer = RevealTimer::spawn(&config, 2, tx, Tick { epoch: 1 });

    assert_eq!(rx.recv().await, Some(Tick { epoch: 1 }));
    assert_eq!(start.elapsed(), RevealConfig::MAX_DELAY);
    assert_eq!(rx.recv().await, Some(Tick { epoch: 1 }));
    assert_eq!(start.elapsed(), RevealConfig::MAX_DELAY * 2);
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_round_with_huge_delay_completes() {
    let mut round = Round::new();
    let plan = round
        .schedule(&["a"], 1, &mut StdRng::seed_from_u64(5))
        .unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    round.arm(RevealTimer::spawn(
        &RevealConfig::from_secs(u64::MAX, 30),
        plan.length,
        tx,
        Tick { epoch: plan.epoch },
    ));

    let tick = rx.recv().await.expect("clamped timer fires");
    assert!(round.reveal_next(tick.epoch).is_some());
    assert_eq!(round.phase(), RoundPhase::Complete);
}

// =========================================================================
// Cancellation
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_dropping_timer_stops_firings() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = RevealTimer::spawn(&RevealConfig::default(), 3, tx, Tick { epoch: 1 });

    assert_eq!(rx.recv().await, Some(Tick { epoch: 1 }));
    drop(timer);

    // The aborted task drops its sender, closing the channel.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_timer_stops_when_receiver_is_gone() {
    let (tx, rx) = mpsc::unbounded_channel();
    let timer = RevealTimer::spawn(&RevealConfig::from_secs(1, 1), 5, tx, Tick { epoch: 1 });
    drop(rx);

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(timer.is_finished());
}

// =========================================================================
// Round driven by its timer
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_round_driven_by_timer_reveals_whole_sequence() {
    let pool = vec!["Bleach", "Naruto", "One Piece"];
    let mut round = Round::new();
    let plan = round
        .schedule(&pool, 3, &mut StdRng::seed_from_u64(3))
        .unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    round.arm(RevealTimer::spawn(
        &RevealConfig::default(),
        plan.length,
        tx,
        Tick { epoch: plan.epoch },
    ));
    assert!(round.is_armed());

    let mut revealed = Vec::new();
    while let Some(tick) = rx.recv().await {
        if let Some(reveal) = round.reveal_next(tick.epoch) {
            revealed.push((reveal.index, reveal.item));
        }
    }

    assert_eq!(round.phase(), RoundPhase::Complete);
    assert!(!round.is_armed(), "timer released on completion");
    let expected: Vec<_> = round
        .sequence()
        .iter()
        .enumerate()
        .map(|(i, item)| (i + 1, *item))
        .collect();
    assert_eq!(revealed, expected);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_round_cancels_pending_reveals() {
    let mut round = Round::new();
    let plan = round
        .schedule(&["a", "b"], 2, &mut StdRng::seed_from_u64(1))
        .unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    round.arm(RevealTimer::spawn(
        &RevealConfig::default(),
        plan.length,
        tx,
        Tick { epoch: plan.epoch },
    ));

    drop(round);

    assert_eq!(rx.recv().await, None);
}
