use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Abuse-throttling decision, injected at the API boundary so handlers stay
/// testable and the backing store can be swapped for a shared counter in
/// multi-instance deployments.
pub trait RateLimiter: Send + Sync {
    /// Record a hit for `key` and report whether it is within the limit.
    fn allow(&self, key: &str) -> bool;
}

/// In-memory sliding-window limiter
///
/// Keeps recent hit instants per key and prunes entries older than the
/// window on every call. Best-effort only: not durable, resets on process
/// restart. Guards login attempts, not a security boundary.
pub struct SlidingWindowLimiter {
    window: Duration,
    max_hits: usize,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, max_hits: usize) -> Self {
        Self {
            window,
            max_hits,
            hits: Mutex::new(HashMap::new()),
        }
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().expect("rate limiter mutex poisoned");

        let window = hits.entry(key.to_string()).or_default();
        while let Some(oldest) = window.front() {
            if now.duration_since(*oldest) > self.window {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() >= self.max_hits {
            return false;
        }

        window.push_back(now);
        true
    }
}

/// Limiter that never throttles, for tests and disabled configurations
pub struct NoopLimiter;

impl RateLimiter for NoopLimiter {
    fn allow(&self, _key: &str) -> bool {
        true
    }
}
