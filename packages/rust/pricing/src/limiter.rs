//! Fixed-budget, fixed-delay pacing for pricing calls.

use std::time::Duration;

/// Enforces the per-partition call budget and the inter-call delay.
///
/// A limiter is scoped to one partition within one run: the scheduler
/// builds a fresh one per partition, so exhausting the budget in the
/// first partition leaves the next partition's budget intact. Nothing is
/// persisted across runs.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    used: u32,
    delay: Duration,
}

impl RateLimiter {
    /// Create a limiter with the given call budget and inter-call delay.
    pub fn new(limit: u32, delay: Duration) -> Self {
        Self {
            limit,
            used: 0,
            delay,
        }
    }

    /// Whether the budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    /// Calls recorded so far.
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Consume one unit of budget, then hold for the inter-call delay.
    ///
    /// The delay is pure upstream courtesy, applied only after a fetch;
    /// skipped rows never pass through here. A zero delay skips the sleep
    /// entirely, which is how tests avoid wall-clock waits.
    pub async fn record_call(&mut self) {
        self.used += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
