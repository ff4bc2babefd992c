//! Scoped timers for the reveal delay and the turn countdown.
//!
//! A [`TimerGuard`] owns its background task and aborts it when dropped, so
//! replacing or clearing the guard is enough to cancel the timer. Events also
//! carry the epoch they were armed in; the worker drops events from an older
//! epoch in case one was already queued when the guard went away.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The presentation delay after `start` elapsed
    RevealDue { epoch: u64 },
    /// One second of the countdown passed
    Tick { epoch: u64 },
}

#[derive(Debug)]
pub struct TimerGuard {
    handle: JoinHandle<()>,
}

impl TimerGuard {
    /// Fire `event` once after `delay`
    pub fn after(delay: Duration, tx: mpsc::Sender<TimerEvent>, event: TimerEvent) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the session shut down
            let _ = tx.send(event).await;
        });
        Self { handle }
    }

    /// Fire `event` every `period`, first after one full period
    pub fn every(period: Duration, tx: mpsc::Sender<TimerEvent>, event: TimerEvent) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
