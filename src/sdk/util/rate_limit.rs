use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

/// Blocking wrapper around a direct in-memory rate limiter, shared between
/// the geocoding and directions calls.
pub struct Limiter {
    inner: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl Limiter {
    pub fn per_minute(requests: u32) -> Arc<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(requests.max(1)).unwrap());
        Arc::new(Self {
            inner: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
        })
    }

    /// Default quota for the hosted mapping API.
    pub fn api_default() -> Arc<Self> {
        Self::per_minute(300)
    }

    /// Blocks the calling thread until the quota admits another request.
    pub fn wait(&self) {
        while let Err(not_until) = self.inner.check() {
            std::thread::sleep(not_until.wait_time_from(self.clock.now()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generous_quota_admits_a_burst_without_blocking() {
        let limiter = Limiter::per_minute(1000);
        for _ in 0..5 {
            limiter.wait();
        }
    }
}
