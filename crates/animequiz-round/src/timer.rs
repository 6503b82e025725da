//! The reveal timer: a cancellable chain of delayed firings.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

use crate::RevealConfig;

/// Handle to a spawned reveal chain.
///
/// The task sends `msg` exactly `reveals` times: once after
/// `initial_delay`, then once every `cadence`. Deadlines are computed
/// from the start instant, so a slow receiver does not push later
/// reveals back.
///
/// Dropping the handle aborts the task; no message is sent after that.
#[derive(Debug)]
pub struct RevealTimer {
    handle: JoinHandle<()>,
}

impl RevealTimer {
    /// Spawns the chain on the current Tokio runtime.
    pub fn spawn<M>(
        config: &RevealConfig,
        reveals: usize,
        tx: mpsc::UnboundedSender<M>,
        msg: M,
    ) -> Self
    where
        M: Clone + Send + 'static,
    {
        let config = config.clone().validated();
        debug!(
            reveals,
            delay_ms = config.initial_delay.as_millis() as u64,
            cadence_ms = config.cadence.as_millis() as u64,
            "reveal timer armed"
        );

        let handle = tokio::spawn(async move {
            let mut deadline = Instant::now().checked_add(config.initial_delay);
            for fired in 1..=reveals {
                let Some(at) = deadline else {
                    warn!(fired, "reveal deadline out of range, stopping timer");
                    return;
                };
                time::sleep_until(at).await;
                if tx.send(msg.clone()).is_err() {
                    debug!(fired, "reveal receiver gone, stopping timer");
                    return;
                }
                trace!(fired, reveals, "reveal timer fired");
                deadline = at.checked_add(config.cadence);
            }
        });

        Self { handle }
    }

    /// Returns `true` once every firing has been sent (or the task was
    /// aborted).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RevealTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
