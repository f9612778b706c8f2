//! Per-session rate limiting for network-initiating calls.
//!
//! Every fetch performed through a [`crate::RymClient`] draws from one
//! shared call budget, so unrelated entity constructions queue behind each
//! other once the budget is exhausted.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Default number of calls admitted per window.
pub const CALL_LIMIT: usize = 5;

/// Default window length in seconds.
pub const RATE_LIMIT: u64 = 60;

/// Sliding-window rate limiter.
///
/// At most `call_limit` calls may begin within any rolling `window`.
/// [`RateLimiter::acquire`] blocks the calling thread until the window
/// admits the call; it never drops or fails a call. The limiter itself
/// cannot fail, only the operation it gates can.
#[derive(Debug)]
pub struct RateLimiter {
    call_limit: usize,
    window: Duration,
    starts: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `call_limit` calls per `window`.
    pub fn new(call_limit: usize, window: Duration) -> Self {
        Self {
            call_limit,
            window,
            starts: Mutex::new(VecDeque::with_capacity(call_limit)),
        }
    }

    /// Block until the window admits another call, then record it.
    pub fn acquire(&self) {
        loop {
            match self.admit(Instant::now()) {
                None => return,
                Some(wait) => {
                    debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, sleeping");
                    thread::sleep(wait);
                }
            }
        }
    }

    /// Record a call if the window admits it right now, without blocking.
    pub fn try_acquire(&self) -> bool {
        self.admit(Instant::now()).is_none()
    }

    /// Admit and record a call start, or return how long until the oldest
    /// recorded start falls out of the window.
    fn admit(&self, now: Instant) -> Option<Duration> {
        let mut starts = self.starts.lock().expect("rate limiter lock poisoned");
        while let Some(&oldest) = starts.front() {
            if now.duration_since(oldest) >= self.window {
                starts.pop_front();
            } else {
                break;
            }
        }
        if starts.len() < self.call_limit {
            starts.push_back(now);
            return None;
        }
        let oldest = *starts.front().expect("window is non-empty");
        Some(self.window.saturating_sub(now.duration_since(oldest)))
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(CALL_LIMIT, Duration::from_secs(RATE_LIMIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_acquire_within_budget() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_window_expiry_readmits() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        thread::sleep(Duration::from_millis(30));
        assert!(limiter.try_acquire());
    }

    #[test]
    fn test_acquire_blocks_until_admitted() {
        let limiter = RateLimiter::new(1, Duration::from_millis(30));
        let started = Instant::now();
        limiter.acquire();
        limiter.acquire();
        assert!(started.elapsed() >= Duration::from_millis(25));
    }
}
