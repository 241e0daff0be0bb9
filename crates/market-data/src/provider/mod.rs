//! Upstream market data sources.
//!
//! This module contains:
//! - The `MarketDataSource` trait every source implements (HTTP or mock)
//! - Rate limiting hints a source publishes to its callers
//! - The Financial Modeling Prep HTTP implementation
//!
//! The pipeline only ever sees `Arc<dyn MarketDataSource>`, so tests swap
//! in scripted sources without touching the network.

mod capabilities;
mod traits;

pub mod fmp;

pub use capabilities::RateLimit;
pub use traits::MarketDataSource;
