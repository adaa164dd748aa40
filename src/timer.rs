//! Timers bound to an owner's lifetime.
//!
//! A [`ScopedTimer`] owns a spawned tokio task and aborts it when dropped, so
//! a timer can never outlive the page session (or service) holding it.

use std::{future::Future, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

// ---

/// Handle to a periodic task that is cancelled on drop.
#[derive(Debug)]
pub struct ScopedTimer {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ScopedTimer {
    /// Run `task` every `period`, starting one period from now.
    ///
    /// Each invocation is awaited before the next tick is taken; ticks that
    /// fall behind are skipped rather than bunched.
    pub fn every<F, Fut>(name: &'static str, period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // ---
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                task().await;
            }
        });

        tracing::debug!(timer = name, period_ms = period.as_millis() as u64, "timer started");
        Self { name, handle }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        // ---
        self.handle.abort();
        tracing::debug!(timer = self.name, "timer cancelled");
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[tokio::test(start_paused = true)]
    async fn test_fires_each_period() {
        // ---
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _timer = ScopedTimer::every("test", Duration::from_secs(1), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        // ---
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let timer = ScopedTimer::every("test", Duration::from_secs(1), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        time::sleep(Duration::from_millis(1500)).await;
        drop(timer);
        time::sleep(Duration::from_secs(10)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_in_flight_task() {
        // ---
        let finished = Arc::new(AtomicUsize::new(0));
        let f = finished.clone();
        let timer = ScopedTimer::every("slow", Duration::from_secs(1), move || {
            let f = f.clone();
            async move {
                time::sleep(Duration::from_secs(5)).await;
                f.fetch_add(1, Ordering::SeqCst);
            }
        });

        time::sleep(Duration::from_secs(2)).await;
        drop(timer);
        time::sleep(Duration::from_secs(30)).await;

        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }
}
