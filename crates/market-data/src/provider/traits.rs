//! Market data source trait definition.

use async_trait::async_trait;

use crate::errors::UpstreamError;
use crate::models::{CompanyProfile, LiveQuote, PartitionQuery, RawRecord};

use super::capabilities::RateLimit;

/// A source of screener rows, quotes, profiles and FX rates.
///
/// Only [`fetch_partition`](Self::fetch_partition) is required. The
/// enrichment and FX operations default to `NotSupported`, which callers
/// treat the same as any other failure: fall back, never abort.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use capranker_market_data::{MarketDataSource, PartitionQuery, RawRecord, UpstreamError};
///
/// struct FixtureSource;
///
/// #[async_trait]
/// impl MarketDataSource for FixtureSource {
///     fn id(&self) -> &'static str {
///         "FIXTURE"
///     }
///
///     async fn fetch_partition(&self, query: &PartitionQuery) -> Result<Vec<RawRecord>, UpstreamError> {
///         Ok(load_fixture(&query.country))
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Constant identifier used in logs and errors ("FMP", "MOCK", ...).
    fn id(&self) -> &'static str;

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Fetch one country partition of the screener.
    ///
    /// An empty vector is a successful, empty market. Failures are returned
    /// as [`UpstreamError`] and never panic.
    async fn fetch_partition(&self, query: &PartitionQuery)
        -> Result<Vec<RawRecord>, UpstreamError>;

    /// Fetch the latest quote for a symbol.
    async fn get_quote(&self, symbol: &str) -> Result<LiveQuote, UpstreamError> {
        let _ = symbol;
        Err(UpstreamError::NotSupported {
            operation: "quote".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch the company profile for a symbol.
    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, UpstreamError> {
        let _ = symbol;
        Err(UpstreamError::NotSupported {
            operation: "profile".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch the USD value of one unit of `currency`.
    ///
    /// The returned value is passed through as-is; callers validate that it
    /// is positive.
    async fn get_usd_rate(&self, currency: &str) -> Result<f64, UpstreamError> {
        let _ = currency;
        Err(UpstreamError::NotSupported {
            operation: "fx".to_string(),
            provider: self.id().to_string(),
        })
    }
}
