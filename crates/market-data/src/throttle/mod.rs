//! Request throttling.
//!
//! Two layers keep the pipeline under the upstream's per-account budget:
//! - [`RateLimiter`]: one token bucket shared by every request made with the same API key
//! - [`Pacer`]: a minimum spacing between consecutive requests of a single worker

mod pacer;
mod rate_limiter;

pub use pacer::Pacer;
pub use rate_limiter::{RateLimitConfig, RateLimiter, DEFAULT_REQUESTS_PER_MINUTE};
