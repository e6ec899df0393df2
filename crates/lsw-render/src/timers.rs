//! Clamped timers
//!
//! Delays that come from dynamic input are clamped before scheduling so a
//! bad value can neither spin the executor nor park a callback forever.

use std::time::Duration;

use smol::stream::StreamExt;
use smol::{Task, Timer};

/// Upper bound used when the caller has no better one
pub const DEFAULT_MAX_DELAY_MS: i64 = 30_000;
/// Lower bound for repeating timers
pub const MIN_INTERVAL_MS: i64 = 100;
/// Interval period used when the caller has none
pub const DEFAULT_INTERVAL_MS: i64 = 1_000;

fn clamp_ms(delay_ms: i64, min_ms: i64, max_ms: i64) -> Duration {
    // max wins over min, and never below zero
    let ms = delay_ms.max(min_ms).min(max_ms).max(0);
    Duration::from_millis(ms as u64)
}

/// Clamp a one-shot delay into `[0, max_delay_ms]`
pub fn clamp_timeout(delay_ms: i64, max_delay_ms: i64) -> Duration {
    clamp_ms(delay_ms, 0, max_delay_ms)
}

/// Clamp a repeating delay into `[100, max_delay_ms]`
pub fn clamp_interval(delay_ms: i64, max_delay_ms: i64) -> Duration {
    clamp_ms(delay_ms, MIN_INTERVAL_MS, max_delay_ms)
}

/// Scheduled timer. Dropping the handle cancels it; call
/// [`TimerHandle::detach`] to let it run unattended.
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    delay: Duration,
    task: Task<()>,
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle").field("delay", &self.delay).finish_non_exhaustive()
    }
}

impl TimerHandle {
    /// Effective (clamped) delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Let the timer run without a handle
    pub fn detach(self) {
        self.task.detach();
    }

    /// Wait for a one-shot timer to fire. Never completes for intervals.
    pub async fn join(self) {
        self.task.await
    }

    /// Cancel and wait for the task to stop
    pub async fn cancel(self) {
        self.task.cancel().await;
    }
}

/// Run `callback` once after the clamped delay
pub fn safe_timeout<F>(callback: F, delay_ms: i64, max_delay_ms: i64) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let delay = clamp_timeout(delay_ms, max_delay_ms);
    tracing::trace!(requested_ms = delay_ms, ?delay, "scheduling timeout");
    let task = smol::spawn(async move {
        Timer::after(delay).await;
        callback();
    });
    TimerHandle { delay, task }
}

/// Run `callback` every clamped period until the handle is cancelled
pub fn safe_interval<F>(mut callback: F, delay_ms: i64, max_delay_ms: i64) -> TimerHandle
where
    F: FnMut() + Send + 'static,
{
    let delay = clamp_interval(delay_ms, max_delay_ms);
    tracing::trace!(requested_ms = delay_ms, ?delay, "scheduling interval");
    let task = smol::spawn(async move {
        let mut ticks = Timer::interval(delay);
        while ticks.next().await.is_some() {
            callback();
        }
    });
    TimerHandle { delay, task }
}
