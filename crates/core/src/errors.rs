//! Core error types for the ranking pipeline.
//!
//! Only run-level failures live here. Record-level data quality problems are
//! `screening::DropReason` values, counted and logged, never returned as `Err`.

use capranker_market_data::UpstreamError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Every partition failed. This is the only fatal pipeline outcome.
    #[error("All {attempted} partitions failed, no usable data")]
    TotalCoverageFailure { attempted: usize },

    #[error("Sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },

    #[error("Invalid lookup table: {0}")]
    Catalog(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl Error {
    /// True for the run-level failure that must surface as a non-zero exit.
    pub fn is_total_coverage_failure(&self) -> bool {
        matches!(self, Self::TotalCoverageFailure { .. })
    }
}
