//! Per-key request throttling.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::keyed::DashMapStateStore;
use governor::Quota;

/// Keys tracked before idle entries are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

/// Decides whether a keyed action may proceed now.
pub trait RateLimiter: Send + Sync {
    fn allow(&self, key: &str) -> bool;
}

/// Allows one action per key per window, backed by a keyed GCRA limiter.
///
/// State lives in process memory, so limits are not shared between
/// instances.
pub struct WindowRateLimiter<C: Clock = DefaultClock> {
    limiter: governor::RateLimiter<String, DashMapStateStore<String>, C, NoOpMiddleware<C::Instant>>,
}

impl WindowRateLimiter {
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, &DefaultClock::default())
    }
}

impl<C: Clock> WindowRateLimiter<C> {
    /// A zero window disables throttling.
    pub fn with_clock(window: Duration, clock: &C) -> Self {
        let quota = Quota::with_period(window)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX));
        Self {
            limiter: governor::RateLimiter::dashmap_with_clock(quota, clock),
        }
    }
}

impl<C> RateLimiter for WindowRateLimiter<C>
where
    C: Clock + Send + Sync,
    C::Instant: Send + Sync,
{
    fn allow(&self, key: &str) -> bool {
        let allowed = self.limiter.check_key(&key.to_string()).is_ok();
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }
        allowed
    }
}
