//! Elapsed-time ticker for a running workout.
//!
//! The counter is advanced by a background task on a fixed interval. The
//! task lives exactly as long as the [`ElapsedTimer`]: dropping the timer
//! (on end, on error, on any state change) aborts it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Shortest accepted tick; tokio intervals reject a zero period.
pub const MIN_TICK: Duration = Duration::from_millis(1);

pub struct ElapsedTimer {
    seconds: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

/// Read-only view of a timer's counter; stays valid after the timer is gone.
#[derive(Clone)]
pub struct ElapsedReader(Arc<AtomicU64>);

impl ElapsedReader {
    pub fn seconds(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl ElapsedTimer {
    /// Start counting from `initial` seconds, one second per `tick`
    /// (at least [`MIN_TICK`]). Must be called from inside a tokio runtime.
    pub fn start(initial: u64, tick: Duration) -> Self {
        let tick = tick.max(MIN_TICK);
        let seconds = Arc::new(AtomicU64::new(initial));
        let counter = Arc::clone(&seconds);
        let first = Instant::now() + tick;

        let task = tokio::spawn(async move {
            let mut ticks = interval_at(first, tick);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });

        Self { seconds, task }
    }

    pub fn seconds(&self) -> u64 {
        self.seconds.load(Ordering::Relaxed)
    }

    pub fn reader(&self) -> ElapsedReader {
        ElapsedReader(Arc::clone(&self.seconds))
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the ticker and return the final count.
    pub fn stop(self) -> u64 {
        self.task.abort();
        self.seconds()
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
