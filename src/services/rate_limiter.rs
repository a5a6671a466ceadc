// Sliding Window Rate Limiter
// Owned, explicitly constructed throttle for outbound search calls.
// Tracks acquisition timestamps in a window; no global state, so
// independent pipeline instances never interfere.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

pub const DEFAULT_MAX_REQUESTS: usize = 10;
pub const DEFAULT_WINDOW_SECS: u64 = 60;

pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, Duration::from_secs(DEFAULT_WINDOW_SECS))
    }
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    fn prune(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        while let Some(front) = timestamps.front() {
            if now.duration_since(*front) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record one acquisition if a slot is free. Returns false when the
    /// window is exhausted.
    pub fn try_acquire(&self) -> bool {
        let mut timestamps = self.timestamps.lock().unwrap();
        let now = Instant::now();
        self.prune(&mut timestamps, now);

        if timestamps.len() >= self.max_requests {
            warn!(
                "[rate_limiter] window exhausted ({} in {:?})",
                self.max_requests, self.window
            );
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Slots still free in the current window.
    pub fn remaining(&self) -> usize {
        let mut timestamps = self.timestamps.lock().unwrap();
        self.prune(&mut timestamps, Instant::now());
        self.max_requests.saturating_sub(timestamps.len())
    }

    /// Time until the oldest acquisition falls out of the window. Zero when
    /// a slot is already free.
    pub fn time_until_next_slot(&self) -> Duration {
        let mut timestamps = self.timestamps.lock().unwrap();
        let now = Instant::now();
        self.prune(&mut timestamps, now);

        if timestamps.len() < self.max_requests {
            return Duration::ZERO;
        }
        match timestamps.front() {
            Some(oldest) => self.window.saturating_sub(now.duration_since(*oldest)),
            None => Duration::ZERO,
        }
    }
}
