use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use capranker_market_data::{common_currencies, MarketDataSource};
use futures::future::join_all;
use log::{debug, error, info, warn};

use super::{PartitionFetcher, PipelineConfig, RunSummary, TopEntry};
use crate::constants::SUMMARY_TOP_N;
use crate::dedup::{first_arrival_by_symbol, Deduplicator};
use crate::enrich::{EnrichConfig, Enricher};
use crate::errors::{Error, Result};
use crate::fx::ExchangeRateCache;
use crate::normalize::CurrencyNormalizer;
use crate::ranking::{rank, RankingSnapshot};
use crate::screening::{DropReason, RecordValidator, Verdict};
use crate::utils::time_utils::snapshot_date_today;

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot: RankingSnapshot,
    pub summary: RunSummary,
}

/// Drives one full pass: fetch every partition, screen, normalize to USD,
/// dedup by company, enrich, rank.
///
/// Every run builds its own [`ExchangeRateCache`], so rates never leak
/// across runs. The only error a run returns for upstream trouble is
/// [`Error::TotalCoverageFailure`]; everything smaller degrades coverage
/// and shows up in the [`RunSummary`].
pub struct RankingPipeline {
    source: Arc<dyn MarketDataSource>,
    config: PipelineConfig,
}

impl RankingPipeline {
    pub fn new(source: Arc<dyn MarketDataSource>, config: PipelineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        let config = &self.config;
        config.validate()?;

        let bounds = config.bounds();
        let rates = Arc::new(ExchangeRateCache::new(Arc::clone(&self.source)));
        let mut summary = RunSummary::default();

        // Fetch
        let fetcher = PartitionFetcher::new(
            Arc::clone(&self.source),
            config.partition_workers,
            config.worker_spacing,
            config.unit_timeout,
        );
        let fetch = fetcher.fetch_all(config.partition_queries()).await;
        summary.partitions_attempted = fetch.attempted;
        summary.partitions_succeeded = fetch.succeeded.len();
        summary.failed_partitions = fetch.failed.clone();
        summary.records_attempted = fetch.records.len();

        if fetch.is_total_failure() {
            error!(
                "No partition succeeded ({} attempted), aborting run",
                fetch.attempted
            );
            return Err(Error::TotalCoverageFailure {
                attempted: fetch.attempted,
            });
        }

        if config.prefetch_rates {
            rates.prefetch(&common_currencies()).await;
        }

        // Screen
        let (records, duplicate_symbols) = first_arrival_by_symbol(fetch.records);
        summary.record_drops(DropReason::DuplicateSymbol, duplicate_symbols);

        let validator = RecordValidator::new(Arc::clone(&config.lexicons), config.market_cap_ceiling);
        let mut candidates = Vec::with_capacity(records.len());
        for record in records {
            match validator.validate(&record) {
                Verdict::Keep(asset_type) => candidates.push((record, asset_type)),
                Verdict::Drop(reason) => {
                    if reason == DropReason::CeilingExceeded {
                        warn!(
                            "Skipping {}: reported USD market cap {:.0} is implausible",
                            record.symbol,
                            record.native_market_cap()
                        );
                    } else {
                        debug!("Dropping {}: {}", record.symbol, reason);
                    }
                    summary.record_drop(reason);
                }
            }
        }

        // Normalize
        let normalizer = CurrencyNormalizer::new(
            Arc::clone(&rates),
            Arc::clone(&config.lexicons),
            bounds,
            config.exclude_otc,
        );
        let normalized = join_all(
            candidates
                .iter()
                .map(|(record, asset_type)| normalizer.normalize(record, *asset_type)),
        )
        .await;

        let mut assets = Vec::with_capacity(normalized.len());
        for result in normalized {
            match result {
                Ok(asset) => assets.push(asset),
                Err(reason) => summary.record_drop(reason),
            }
        }
        info!(
            "{} of {} screened records normalized to USD",
            assets.len(),
            candidates.len()
        );

        // Dedup
        let deduplicator = Deduplicator::new(Arc::clone(&config.lexicons), config.dedup_key);
        let deduped = deduplicator.dedup(assets);
        summary.record_drops(DropReason::DuplicateListing, deduped.dropped.len());
        info!(
            "{} companies after dedup ({} secondary listings removed)",
            deduped.kept.len(),
            deduped.dropped.len()
        );

        // Enrich
        let enricher = Enricher::new(
            Arc::clone(&self.source),
            EnrichConfig {
                workers: config.enrich_workers,
                spacing: fetcher.spacing(),
                unit_timeout: config.unit_timeout,
                refresh_quotes: config.refresh_quotes,
                profile_threshold: config.profile_threshold,
                bounds,
            },
        );
        let enriched = enricher.enrich_all(deduped.kept).await;
        for (_, reason) in &enriched.dropped {
            summary.record_drop(*reason);
        }
        summary.quotes_refreshed = enriched.quotes_refreshed;
        summary.quote_failures = enriched.quote_failures;
        summary.profiles_attached = enriched.profiles_attached;
        summary.enrich_timeouts = enriched.timed_out;

        // Rank
        let ranked = rank(enriched.assets);
        if ranked.is_empty() {
            warn!("Run produced an empty ranking");
        }

        let mut country_counts = BTreeMap::new();
        for ranked_asset in &ranked {
            *country_counts
                .entry(ranked_asset.asset.country.clone())
                .or_default() += 1;
        }

        summary.records_kept = ranked.len();
        summary.country_counts = country_counts;
        summary.top = ranked.iter().take(SUMMARY_TOP_N).map(TopEntry::from).collect();
        summary.rates = rates.snapshot().await;
        summary.elapsed = started.elapsed();
        summary.log();

        let snapshot = RankingSnapshot::new(
            config.snapshot_date.unwrap_or_else(snapshot_date_today),
            self.source.id(),
            ranked,
        );
        Ok(RunReport { snapshot, summary })
    }
}
