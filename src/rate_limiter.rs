use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{self, Instant};

/// Process-wide gate on outbound upstream calls.
///
/// Grants are spaced at least `1s / rps` apart on the monotonic clock, so no
/// rolling one-second window sees more than `rps` grants. Waiters queue on a
/// fair async mutex and are served in arrival order.
pub struct RateLimiter {
    rps: i64,
    interval: Option<Duration>,
    last_grant: Mutex<Option<Instant>>,
    acquired: AtomicU64,
}

impl RateLimiter {
    /// `rps <= 0` builds a limiter that never waits.
    pub fn new(rps: i64) -> Self {
        let interval = (rps > 0).then(|| {
            let per_second = u32::try_from(rps).unwrap_or(u32::MAX);
            Duration::from_secs(1) / per_second
        });

        Self {
            rps,
            interval,
            last_grant: Mutex::new(None),
            acquired: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    pub fn rps(&self) -> i64 {
        self.rps
    }

    /// Total slots handed out since construction.
    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }

    /// Wait for the next free slot. Cannot fail.
    pub async fn acquire(&self) {
        let Some(interval) = self.interval else {
            self.acquired.fetch_add(1, Ordering::Relaxed);
            return;
        };

        // A cancelled waiter drops the guard without recording a grant.
        let mut last = self.last_grant.lock().await;
        if let Some(prev) = *last {
            time::sleep_until(prev + interval).await;
        }
        *last = Some(Instant::now());
        self.acquired.fetch_add(1, Ordering::Relaxed);
    }
}
