//! Interval scheduler with structural single-flight.
//!
//! One firing runs at a time: the loop awaits the task before asking the
//! interval for the next tick, so overlapping runs are impossible by
//! construction rather than by luck. Ticks that come due while a run is
//! still in flight are delayed, not stacked. Cross-process exclusion is a
//! deployment concern (run one worker instance).

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::debug;

/// Interval-driven runner for one recurring task.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    /// Creates a scheduler with the given period.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Runs the task on every tick, forever.
    ///
    /// The future returned by `task` is awaited to completion before the
    /// next tick fires.
    pub async fn run<F, Fut>(&self, name: &str, mut task: F) -> !
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let started = Instant::now();
            task().await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            debug!(job = name, elapsed_ms, "job run finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn runs_never_overlap_even_when_slow() {
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        let handle = {
            let running = Arc::clone(&running);
            let max_seen = Arc::clone(&max_seen);
            let completed = Arc::clone(&completed);
            tokio::spawn(async move {
                let scheduler = Scheduler::new(Duration::from_millis(100));
                scheduler
                    .run("slow-job", move || {
                        let running = Arc::clone(&running);
                        let max_seen = Arc::clone(&max_seen);
                        let completed = Arc::clone(&completed);
                        async move {
                            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                            max_seen.fetch_max(now, Ordering::SeqCst);
                            // Task takes longer than the period.
                            tokio::time::sleep(Duration::from_millis(250)).await;
                            running.fetch_sub(1, Ordering::SeqCst);
                            completed.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_secs(2)).await;
        handle.abort();

        assert_eq!(max_seen.load(Ordering::SeqCst), 1, "runs overlapped");
        assert!(completed.load(Ordering::SeqCst) >= 2, "job never re-ran");
    }

    #[tokio::test(start_paused = true)]
    async fn fast_tasks_run_roughly_once_per_period() {
        let completed = Arc::new(AtomicUsize::new(0));

        let handle = {
            let completed = Arc::clone(&completed);
            tokio::spawn(async move {
                let scheduler = Scheduler::new(Duration::from_millis(100));
                scheduler
                    .run("fast-job", move || {
                        let completed = Arc::clone(&completed);
                        async move {
                            completed.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(1050)).await;
        handle.abort();

        let runs = completed.load(Ordering::SeqCst);
        assert!((10..=12).contains(&runs), "expected ~10 runs, got {runs}");
    }
}
