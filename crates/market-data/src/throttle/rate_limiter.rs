//! Account-wide token bucket.
//!
//! Upstream limits are expressed per API key, not per connection, so every
//! worker of every pool draws from the same bucket.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Default budget: 300 requests per minute (the upstream's starter plan).
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 300;

/// Default burst: enough for one round of partition workers.
pub const DEFAULT_BURST_CAPACITY: f64 = 12.0;

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    /// Tokens per second
    rate: f64,
    capacity: f64,
}

impl TokenBucket {
    fn from_config(config: &RateLimitConfig) -> Self {
        let capacity = config.burst_capacity.max(1.0);
        Self {
            tokens: capacity,
            last_refill: Instant::now(),
            rate: f64::from(config.requests_per_minute.max(1)) / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Take a token, or return how long until one is available.
    fn take(&mut self) -> Result<(), Duration> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / self.rate))
        }
    }
}

/// Rate limiter configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst_capacity: f64,
}

impl RateLimitConfig {
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
            ..Self::default()
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            burst_capacity: DEFAULT_BURST_CAPACITY,
        }
    }
}

/// Token bucket rate limiter shared across workers.
///
/// The bucket mutex is a std mutex held only for arithmetic; waiting happens
/// outside of it with `tokio::time::sleep`.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<TokenBucket>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            bucket: Mutex::new(TokenBucket::from_config(&config)),
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Recovers from poison: a wrong token count is harmless, a panic is not.
    fn lock_bucket(&self) -> MutexGuard<'_, TokenBucket> {
        self.bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Wait until a token is available, then take it.
    pub async fn acquire(&self) {
        loop {
            let wait = match self.lock_bucket().take() {
                Ok(()) => return,
                Err(wait) => wait,
            };
            debug!("Rate limiter: waiting {:?} for a token", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Take a token without waiting. Returns false when the bucket is empty.
    pub fn try_acquire(&self) -> bool {
        self.lock_bucket().take().is_ok()
    }

    pub fn remaining_tokens(&self) -> f64 {
        let mut bucket = self.lock_bucket();
        bucket.refill();
        bucket.tokens
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
