use std::collections::HashMap;
use std::sync::Arc;

use capranker_market_data::{fallback_usd_rate, MarketDataSource};
use futures::future::join_all;
use log::{debug, info, warn};
use tokio::sync::{OnceCell, RwLock};

use super::fx_model::{RateSource, UsdRate};
use crate::constants::USD;

/// Per-run cache of currency → USD multipliers.
///
/// One instance is created per pipeline run and passed down explicitly.
/// Each currency gets its own `OnceCell`, so concurrent callers for the same
/// uncached currency share a single live lookup while different currencies
/// resolve independently. The map lock is only held to find or insert a
/// cell, never across the lookup itself.
pub struct ExchangeRateCache {
    source: Arc<dyn MarketDataSource>,
    cells: RwLock<HashMap<String, Arc<OnceCell<UsdRate>>>>,
}

impl ExchangeRateCache {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// USD multiplier for `currency`. Never fails; see [`resolve`](Self::resolve).
    pub async fn rate(&self, currency: &str) -> f64 {
        self.resolve(currency).await.rate
    }

    /// Resolve `currency` to a USD rate.
    ///
    /// USD is always 1.0 with no I/O. Otherwise the live rate is used when it
    /// is positive, then the static fallback table, then 1.0 for currencies
    /// neither knows.
    pub async fn resolve(&self, currency: &str) -> UsdRate {
        let code = currency.trim().to_uppercase();
        if code == USD {
            return UsdRate::identity();
        }

        let cell = self.cell_for(&code).await;
        cell.get_or_init(|| self.lookup(code.clone())).await.clone()
    }

    /// Warm the cache for `currencies` concurrently.
    pub async fn prefetch(&self, currencies: &[String]) -> usize {
        let resolved = join_all(currencies.iter().map(|c| self.resolve(c))).await;
        let live = resolved
            .iter()
            .filter(|r| r.source == RateSource::Live)
            .count();
        info!(
            "Pre-fetched exchange rates for {} currencies ({} live)",
            resolved.len(),
            live
        );
        resolved.len()
    }

    /// Every rate resolved so far, sorted by currency.
    pub async fn snapshot(&self) -> Vec<UsdRate> {
        let cells = self.cells.read().await;
        let mut rates: Vec<UsdRate> = cells.values().filter_map(|c| c.get().cloned()).collect();
        rates.sort_by(|a, b| a.currency.cmp(&b.currency));
        rates
    }

    async fn cell_for(&self, code: &str) -> Arc<OnceCell<UsdRate>> {
        if let Some(cell) = self.cells.read().await.get(code) {
            return cell.clone();
        }
        self.cells
            .write()
            .await
            .entry(code.to_string())
            .or_default()
            .clone()
    }

    async fn lookup(&self, code: String) -> UsdRate {
        match self.source.get_usd_rate(&code).await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                debug!("Exchange rate {} to USD = {:.6}", code, rate);
                return UsdRate {
                    currency: code,
                    rate,
                    source: RateSource::Live,
                };
            }
            Ok(rate) => warn!("Non-positive live rate {} for {}, using fallback", rate, code),
            Err(e) => warn!("Live rate lookup for {} failed: {}, using fallback", code, e),
        }

        match fallback_usd_rate(&code) {
            Some(rate) => {
                warn!("Using fallback rate: {} to USD = {:.6}", code, rate);
                UsdRate {
                    currency: code,
                    rate,
                    source: RateSource::Fallback,
                }
            }
            None => {
                warn!("Unknown currency {}, converting at 1.0", code);
                UsdRate {
                    currency: code,
                    rate: 1.0,
                    source: RateSource::Unconverted,
                }
            }
        }
    }
}
