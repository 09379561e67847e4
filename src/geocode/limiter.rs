//! Minimum spacing between outbound geocoder lookups.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum interval between consecutive [`RateLimiter::acquire`]
/// calls. Lookups are issued one at a time, so no locking is needed.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Time left before the next lookup may start
    pub fn remaining(&self) -> Duration {
        match self.last {
            Some(last) => self.min_interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Wait until the interval since the previous lookup has passed
    pub async fn acquire(&mut self) {
        let wait = self.remaining();
        if !wait.is_zero() {
            debug!("Rate limiting geocoder for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        self.last = Some(Instant::now());
    }
}
