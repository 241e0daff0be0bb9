/// Classification for retry policy.
///
/// Used to determine how a caller should respond to a failed upstream request.
///
/// # Behavior Summary
///
/// | Class | Retry the same request? | Notes |
/// |-------|-------------------------|-------|
/// | `WithBackoff` | Once, after a fixed delay | Throttling signal from the upstream |
/// | `Never` | No | Transport, decode and status failures are final for the request |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Retry the same request once after a fixed backoff.
    ///
    /// Only used for throttling (HTTP 429 or a rate-limit marker in the body).
    /// The retry is never repeated: a second throttle is reported to the caller.
    WithBackoff,

    /// Never retry.
    /// The request failed for a reason a second attempt will not fix,
    /// or it already timed out and the unit of work is treated as failed.
    Never,
}

/// Coarse failure category used in run summaries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum FailureKind {
    /// The upstream throttled the request.
    RateLimited,
    /// Network, DNS, timeout or non-success HTTP status.
    Transport,
    /// The body could not be decoded into the expected shape.
    Decode,
    /// The source does not implement the operation.
    Unsupported,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Transport => "transport",
            Self::Decode => "decode",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
