//! Financial Modeling Prep (FMP) market data source.
//!
//! Endpoints used:
//! - `/v3/stock-screener` for country partitions
//! - `/v3/quote/{symbol}` for live quotes
//! - `/v3/profile/{symbol}` for company profiles (logo)
//! - `/v3/fx/{CCY}USD` for exchange rates
//!
//! FMP signals throttling either with HTTP 429 or with a 200 response whose
//! body carries a "Limit Reach" message, so both are checked.

mod models;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::{RetryClass, UpstreamError};
use crate::models::{CompanyProfile, LiveQuote, PartitionQuery, RawRecord};
use crate::provider::{MarketDataSource, RateLimit};
use crate::throttle::{RateLimitConfig, RateLimiter};

use self::models::{ErrorBody, FxQuote};

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api";
const PROVIDER_ID: &str = "FMP";
const RATE_LIMIT_MARKER: &str = "Limit Reach";

/// Connection settings for [`FmpProvider`].
#[derive(Clone, Debug)]
pub struct FmpConfig {
    pub base_url: String,
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay before the single retry of a throttled request
    pub rate_limit_backoff: Duration,
    /// Minimum spacing advertised to callers for each worker
    pub min_delay: Duration,
    pub rate_limit: RateLimitConfig,
}

impl FmpConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            rate_limit_backoff: Duration::from_secs(1),
            min_delay: Duration::from_millis(50),
            rate_limit: RateLimitConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// FMP over HTTP.
///
/// Every request draws from one shared [`RateLimiter`] before it is sent.
/// A throttled request is retried exactly once after `rate_limit_backoff`;
/// a second throttle is returned to the caller.
pub struct FmpProvider {
    client: Client,
    config: FmpConfig,
    limiter: Arc<RateLimiter>,
}

impl FmpProvider {
    pub fn new(config: FmpConfig) -> Result<Self, UpstreamError> {
        let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        Self::with_limiter(config, limiter)
    }

    /// Build a provider that shares an existing limiter.
    pub fn with_limiter(config: FmpConfig, limiter: Arc<RateLimiter>) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport {
                endpoint: config.base_url.clone(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            limiter,
        })
    }

    /// GET `path` and decode it, retrying once on throttling.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        match self.fetch_once(path, params).await {
            Err(err) if err.retry_class() == RetryClass::WithBackoff => {
                warn!(
                    "FMP throttled {}, retrying once in {:?}",
                    path, self.config.rate_limit_backoff
                );
                tokio::time::sleep(self.config.rate_limit_backoff).await;
                self.fetch_once(path, params).await
            }
            other => other,
        }
    }

    async fn fetch_once<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        self.limiter.acquire().await;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("FMP request: {} with {} params", path, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(path, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited {
                endpoint: path.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(path, e))?;

        if body.contains(RATE_LIMIT_MARKER) {
            return Err(UpstreamError::RateLimited {
                endpoint: path.to_string(),
            });
        }

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ErrorBody>(&body) {
                warn!("FMP {} returned {}: {}", path, status, error.message);
            }
            return Err(UpstreamError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(error) => error.message,
                Err(_) => e.to_string(),
            };
            UpstreamError::Decode {
                endpoint: path.to_string(),
                message,
            }
        })
    }

    /// First element of a single-symbol list endpoint.
    async fn get_first<T: DeserializeOwned>(&self, path: String) -> Result<T, UpstreamError> {
        let items: Vec<T> = self.get_json(&path, &[]).await?;
        items.into_iter().next().ok_or(UpstreamError::Empty(path))
    }
}

#[async_trait]
impl MarketDataSource for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: self.config.rate_limit.requests_per_minute,
            min_delay: self.config.min_delay,
        }
    }

    async fn fetch_partition(
        &self,
        query: &PartitionQuery,
    ) -> Result<Vec<RawRecord>, UpstreamError> {
        let records: Vec<RawRecord> = self
            .get_json("/v3/stock-screener", &query.query_pairs())
            .await?;
        debug!("FMP screener {} returned {} rows", query, records.len());
        Ok(records)
    }

    async fn get_quote(&self, symbol: &str) -> Result<LiveQuote, UpstreamError> {
        self.get_first(format!("/v3/quote/{}", urlencoding::encode(symbol)))
            .await
    }

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, UpstreamError> {
        self.get_first(format!("/v3/profile/{}", urlencoding::encode(symbol)))
            .await
    }

    async fn get_usd_rate(&self, currency: &str) -> Result<f64, UpstreamError> {
        let pair = format!("{}USD", currency.trim().to_uppercase());
        let path = format!("/v3/fx/{}", urlencoding::encode(&pair));
        let quote: FxQuote = self.get_first(path.clone()).await?;
        quote.price.ok_or(UpstreamError::Empty(path))
    }
}
