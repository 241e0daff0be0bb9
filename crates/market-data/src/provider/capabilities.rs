//! Rate limiting hints published by a source.

use std::time::Duration;

/// How aggressively a source may be called.
///
/// Callers combine `min_delay` with their own per-worker spacing and use the
/// larger of the two.
#[derive(Clone, Debug, PartialEq)]
pub struct RateLimit {
    /// Maximum requests allowed per minute for the account.
    pub requests_per_minute: u32,

    /// Minimum delay between consecutive requests of one worker.
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 300,
            min_delay: Duration::from_millis(50),
        }
    }
}

impl RateLimit {
    /// A source with no limits, used by in-memory sources.
    pub fn unlimited() -> Self {
        Self {
            requests_per_minute: u32::MAX,
            min_delay: Duration::ZERO,
        }
    }
}
