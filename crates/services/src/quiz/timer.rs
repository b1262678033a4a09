//! Recurring tick source for timed sessions.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// Period between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cancellable handle to a background ticker task.
///
/// Ticks are delivered through [`TimerHandle::next_tick`] to a single consumer.
/// After [`TimerHandle::cancel`] returns no further tick is observed, and
/// dropping the handle cancels it.
#[derive(Debug)]
pub struct TimerHandle {
    ticks: mpsc::Receiver<()>,
    task: Option<JoinHandle<()>>,
    cancelled: bool,
}

impl TimerHandle {
    /// Spawn a ticker firing every `period`, first one `period` from now.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn start(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        debug!(period_ms = period.as_millis(), "timer started");
        Self {
            ticks: rx,
            task: Some(task),
            cancelled: false,
        }
    }

    /// Ticker with the standard one-second period.
    #[must_use]
    pub fn every_second() -> Self {
        Self::start(TICK_PERIOD)
    }

    /// Wait for the next tick; `None` once cancelled.
    pub async fn next_tick(&mut self) -> Option<()> {
        if self.cancelled {
            return None;
        }
        self.ticks.recv().await
    }

    /// Stop the ticker; later calls are no-ops.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.ticks.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        debug!("timer cancelled");
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_one_tick_per_period() {
        let mut timer = TimerHandle::every_second();
        let started = Instant::now();
        for _ in 0..3 {
            assert_eq!(timer.next_tick().await, Some(()));
        }
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_ticks_again() {
        let mut timer = TimerHandle::every_second();
        assert_eq!(timer.next_tick().await, Some(()));

        // Let a tick get buffered before cancelling.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        timer.cancel();

        assert!(timer.is_cancelled());
        assert_eq!(timer.next_tick().await, None);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(timer.next_tick().await, None);
    }
}
