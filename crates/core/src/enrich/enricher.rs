use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use capranker_market_data::{MarketDataSource, Pacer};
use futures::future::join_all;
use log::{debug, warn};

use crate::assets::NormalizedAsset;
use crate::constants::{
    DEFAULT_ENRICH_WORKERS, DEFAULT_PROFILE_THRESHOLD, DEFAULT_UNIT_TIMEOUT_SECS,
    DEFAULT_WORKER_SPACING_MS,
};
use crate::screening::{DropReason, MarketCapBounds};

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub workers: usize,
    pub spacing: Duration,
    /// Per-record timeout covering the quote and profile calls
    pub unit_timeout: Duration,
    pub refresh_quotes: bool,
    /// Profiles are only fetched for caps strictly above this (USD)
    pub profile_threshold: f64,
    pub bounds: MarketCapBounds,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_ENRICH_WORKERS,
            spacing: Duration::from_millis(DEFAULT_WORKER_SPACING_MS),
            unit_timeout: Duration::from_secs(DEFAULT_UNIT_TIMEOUT_SECS),
            refresh_quotes: true,
            profile_threshold: DEFAULT_PROFILE_THRESHOLD,
            bounds: MarketCapBounds::default(),
        }
    }
}

/// Result of an enrichment pass.
#[derive(Debug, Clone, Default)]
pub struct EnrichOutcome {
    /// Surviving assets, in input order
    pub assets: Vec<NormalizedAsset>,
    /// Records whose refreshed cap fell outside the bounds
    pub dropped: Vec<(String, DropReason)>,
    pub quotes_refreshed: usize,
    pub quote_failures: usize,
    pub profiles_attached: usize,
    pub timed_out: usize,
}

enum Enriched {
    Kept {
        asset: NormalizedAsset,
        quote_refreshed: Option<bool>,
        profile_attached: bool,
    },
    Dropped(String, DropReason),
    TimedOut(NormalizedAsset),
}

/// Bounded, paced pool that refreshes quotes and attaches profile images.
///
/// Nothing here is fatal: a failed quote keeps the screener values, a failed
/// profile leaves `image` empty, and a record that times out is kept as-is.
/// The only way a record leaves is a refreshed cap outside the bounds.
pub struct Enricher {
    source: Arc<dyn MarketDataSource>,
    config: EnrichConfig,
}

impl Enricher {
    pub fn new(source: Arc<dyn MarketDataSource>, config: EnrichConfig) -> Self {
        Self { source, config }
    }

    pub async fn enrich_all(&self, assets: Vec<NormalizedAsset>) -> EnrichOutcome {
        let total = assets.len();
        let queue: Mutex<VecDeque<(usize, NormalizedAsset)>> =
            Mutex::new(assets.into_iter().enumerate().collect());
        let workers = self.config.workers.clamp(1, total.max(1));

        let per_worker = join_all((0..workers).map(|_| self.run_worker(&queue))).await;

        let mut results: Vec<(usize, Enriched)> = per_worker.into_iter().flatten().collect();
        results.sort_by_key(|(index, _)| *index);

        let mut outcome = EnrichOutcome::default();
        for (_, result) in results {
            match result {
                Enriched::Kept {
                    asset,
                    quote_refreshed,
                    profile_attached,
                } => {
                    match quote_refreshed {
                        Some(true) => outcome.quotes_refreshed += 1,
                        Some(false) => outcome.quote_failures += 1,
                        None => {}
                    }
                    if profile_attached {
                        outcome.profiles_attached += 1;
                    }
                    outcome.assets.push(asset);
                }
                Enriched::Dropped(symbol, reason) => outcome.dropped.push((symbol, reason)),
                Enriched::TimedOut(asset) => {
                    outcome.timed_out += 1;
                    outcome.assets.push(asset);
                }
            }
        }
        outcome
    }

    async fn run_worker(
        &self,
        queue: &Mutex<VecDeque<(usize, NormalizedAsset)>>,
    ) -> Vec<(usize, Enriched)> {
        let mut pacer = Pacer::new(self.config.spacing);
        let mut results = Vec::new();

        loop {
            let next = queue
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .pop_front();
            let Some((index, asset)) = next else {
                break;
            };

            let fallback = asset.clone();
            let enriched = match tokio::time::timeout(
                self.config.unit_timeout,
                self.enrich_one(asset, &mut pacer),
            )
            .await
            {
                Ok(enriched) => enriched,
                Err(_) => {
                    warn!(
                        "Enrichment of {} timed out after {:?}, keeping screener data",
                        fallback.symbol, self.config.unit_timeout
                    );
                    Enriched::TimedOut(fallback)
                }
            };
            results.push((index, enriched));
        }
        results
    }

    async fn enrich_one(&self, mut asset: NormalizedAsset, pacer: &mut Pacer) -> Enriched {
        let mut quote_refreshed = None;

        if self.config.refresh_quotes {
            pacer.wait().await;
            match self.source.get_quote(&asset.symbol).await {
                Ok(quote) => {
                    quote_refreshed = Some(true);
                    let divisor = asset.minor_unit_divisor;
                    if let Some(price) = quote.price.filter(|p| *p > 0.0) {
                        asset.price = Some(price / divisor);
                    }
                    asset.previous_close = quote.previous_close.map(|p| p / divisor);
                    asset.percent_change = quote.changes_percentage;
                    if quote.volume.is_some() {
                        asset.volume = quote.volume;
                    }

                    if let Some((shares, price)) = quote.cap_inputs() {
                        let recomputed = shares * price / divisor * asset.fx_rate;
                        if let Err(reason) = self.config.bounds.check(recomputed) {
                            warn!(
                                "Dropping {}: recomputed market cap ${:.0} is out of bounds ({})",
                                asset.symbol, recomputed, reason
                            );
                            return Enriched::Dropped(asset.symbol, reason);
                        }
                        debug!(
                            "Recomputed {} market cap {:.0} -> {:.0}",
                            asset.symbol, asset.market_cap_usd, recomputed
                        );
                        asset.market_cap_usd = recomputed;
                    }
                }
                Err(e) => {
                    quote_refreshed = Some(false);
                    debug!("Quote refresh for {} failed: {}", asset.symbol, e);
                }
            }
        }

        let mut profile_attached = false;
        if asset.market_cap_usd > self.config.profile_threshold {
            pacer.wait().await;
            match self.source.get_profile(&asset.symbol).await {
                Ok(profile) => {
                    if let Some(url) = profile.image_url() {
                        asset.image = Some(url.to_string());
                        profile_attached = true;
                    }
                }
                Err(e) => debug!("Profile for {} unavailable: {}", asset.symbol, e),
            }
        }

        Enriched::Kept {
            asset,
            quote_refreshed,
            profile_attached,
        }
    }
}
