//! Capranker Market Data Crate
//!
//! This crate owns everything that touches the upstream market-data API
//! for the global market-cap ranking pipeline.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Country-partitioned screener queries (one request per national market)
//! - Live quotes, company profiles and USD exchange rates
//! - Throttling: an account-wide token bucket plus per-worker request spacing
//! - A JSON-driven market catalog (exchange suffixes, currencies, minor units)
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +--------------------+
//! |  PartitionQuery  | --> |  MarketDataSource  |  (FMP over HTTP, mocks in tests)
//! +------------------+     +--------------------+
//!                                   |
//!                                   v
//!                          +------------------+
//!                          |    RawRecord     |  (native currency, native units)
//!                          +------------------+
//!                                   |
//!                                   v
//!                          +------------------+
//!                          |  markets catalog |  (currency + minor-unit detection)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`RawRecord`] - One screener row as returned by the upstream
//! - [`LiveQuote`] - Real-time quote used to refresh price/volume data
//! - [`CompanyProfile`] - Profile data (logo, sector) for enrichment
//! - [`PartitionQuery`] - A country-scoped screener query
//! - [`UpstreamError`] - Failure taxonomy for a single upstream request

pub mod errors;
pub mod markets;
pub mod models;
pub mod provider;
pub mod throttle;

pub use errors::{FailureKind, RetryClass, UpstreamError};
pub use markets::{
    common_currencies, default_partitions, detect_currency, fallback_usd_rate, CurrencyDetection,
    DetectionSource,
};
pub use models::{CompanyProfile, LiveQuote, PartitionQuery, RawRecord};
pub use provider::fmp::{FmpConfig, FmpProvider};
pub use provider::{MarketDataSource, RateLimit};
pub use throttle::{Pacer, RateLimitConfig, RateLimiter};
