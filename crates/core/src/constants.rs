/// The pivot currency; its rate is always exactly 1.0
pub const USD: &str = "USD";

/// Lower market cap bound, exclusive (USD)
pub const DEFAULT_MARKET_CAP_FLOOR: f64 = 50_000_000.0;

/// Upper market cap bound, exclusive (USD). Anything above is upstream corruption.
pub const DEFAULT_MARKET_CAP_CEILING: f64 = 5_000_000_000_000.0;

/// Profiles (logos) are only fetched above this cap (USD)
pub const DEFAULT_PROFILE_THRESHOLD: f64 = 50_000_000_000.0;

pub const DEFAULT_PARTITION_WORKERS: usize = 12;

pub const DEFAULT_ENRICH_WORKERS: usize = 8;

/// Minimum spacing between one worker's consecutive requests
pub const DEFAULT_WORKER_SPACING_MS: u64 = 50;

/// Per-unit timeout for a partition fetch or a record enrichment
pub const DEFAULT_UNIT_TIMEOUT_SECS: u64 = 30;

/// Number of assets listed in the run summary
pub const SUMMARY_TOP_N: usize = 10;
