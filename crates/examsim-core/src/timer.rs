//! Countdown driver for timed exams.
//!
//! The driver never touches a [`Session`](crate::session::Session). It runs
//! on its own task and delivers [`Tick`]s over a channel; whoever owns the
//! session applies each tick with `Session::tick`, so the session keeps a
//! single writer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// One elapsed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// A running countdown. Dropping it stops the ticking task.
#[derive(Debug)]
pub struct Countdown {
    ticks: mpsc::Receiver<Tick>,
    handle: JoinHandle<()>,
}

/// Start delivering a [`Tick`] every `period`, the first one after a full
/// period has elapsed.
pub fn spawn_countdown(period: Duration) -> Countdown {
    let (tx, ticks) = mpsc::channel(16);
    let handle = tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        loop {
            interval.tick().await;
            if tx.send(Tick).await.is_err() {
                break;
            }
        }
    });
    Countdown { ticks, handle }
}

impl Countdown {
    /// Wait for the next tick. `None` once the countdown was stopped.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.ticks.recv().await
    }

    pub fn stop(&mut self) {
        self.handle.abort();
        self.ticks.close();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
