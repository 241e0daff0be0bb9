use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use log::info;

use super::FailedPartition;
use crate::assets::RankedAsset;
use crate::fx::{RateSource, UsdRate};
use crate::screening::{DropCategory, DropReason};
use crate::utils::format::{format_large_number, truncate};

/// One line of the top-N table.
#[derive(Debug, Clone, PartialEq)]
pub struct TopEntry {
    pub rank: usize,
    pub symbol: String,
    pub name: String,
    pub country: String,
    pub market_cap_usd: f64,
}

impl From<&RankedAsset> for TopEntry {
    fn from(ranked: &RankedAsset) -> Self {
        Self {
            rank: ranked.rank,
            symbol: ranked.asset.symbol.clone(),
            name: ranked.asset.name.clone(),
            country: ranked.asset.country.clone(),
            market_cap_usd: ranked.asset.market_cap_usd,
        }
    }
}

/// What a run did, for operators.
///
/// `records_attempted == records_kept + dropped_total()` holds for every
/// completed run: each raw record either ranks or is dropped for one reason.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub partitions_attempted: usize,
    pub partitions_succeeded: usize,
    pub failed_partitions: Vec<FailedPartition>,
    pub records_attempted: usize,
    pub records_kept: usize,
    pub drops: BTreeMap<DropReason, usize>,
    pub rates: Vec<UsdRate>,
    pub country_counts: BTreeMap<String, usize>,
    pub top: Vec<TopEntry>,
    pub quotes_refreshed: usize,
    pub quote_failures: usize,
    pub profiles_attached: usize,
    pub enrich_timeouts: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn record_drop(&mut self, reason: DropReason) {
        self.record_drops(reason, 1);
    }

    pub fn record_drops(&mut self, reason: DropReason, count: usize) {
        if count > 0 {
            *self.drops.entry(reason).or_default() += count;
        }
    }

    pub fn dropped(&self, reason: DropReason) -> usize {
        self.drops.get(&reason).copied().unwrap_or(0)
    }

    pub fn dropped_total(&self) -> usize {
        self.drops.values().sum()
    }

    pub fn drops_by_category(&self) -> BTreeMap<DropCategory, usize> {
        let mut by_category = BTreeMap::new();
        for (reason, count) in &self.drops {
            *by_category.entry(reason.category()).or_default() += count;
        }
        by_category
    }

    /// Count of resolved rates per source.
    pub fn rates_by_source(&self, source: RateSource) -> usize {
        self.rates.iter().filter(|r| r.source == source).count()
    }

    /// Emit the summary at info level, one log line per report line.
    pub fn log(&self) {
        for line in self.to_string().lines() {
            info!("{}", line);
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ranking run finished in {:.1}s", self.elapsed.as_secs_f64())?;
        writeln!(
            f,
            "Partitions: {}/{} succeeded",
            self.partitions_succeeded, self.partitions_attempted
        )?;
        for failed in &self.failed_partitions {
            writeln!(f, "  failed {} [{}]: {}", failed.query, failed.kind, failed.message)?;
        }

        writeln!(
            f,
            "Records: {} attempted, {} kept, {} dropped",
            self.records_attempted,
            self.records_kept,
            self.dropped_total()
        )?;
        for (category, count) in self.drops_by_category() {
            let reasons: Vec<String> = self
                .drops
                .iter()
                .filter(|(reason, _)| reason.category() == category)
                .map(|(reason, n)| format!("{} {}", reason, n))
                .collect();
            writeln!(f, "  {}: {} ({})", category, count, reasons.join(", "))?;
        }

        writeln!(
            f,
            "Exchange rates: {} resolved ({} live, {} fallback, {} unconverted)",
            self.rates.len(),
            self.rates_by_source(RateSource::Live),
            self.rates_by_source(RateSource::Fallback),
            self.rates_by_source(RateSource::Unconverted)
        )?;
        writeln!(
            f,
            "Enrichment: {} quotes refreshed, {} quote failures, {} timeouts, {} logos",
            self.quotes_refreshed, self.quote_failures, self.enrich_timeouts, self.profiles_attached
        )?;

        if !self.country_counts.is_empty() {
            let mut countries: Vec<(&String, &usize)> = self.country_counts.iter().collect();
            countries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            let listed: Vec<String> = countries
                .iter()
                .take(10)
                .map(|(country, n)| format!("{} {}", country, n))
                .collect();
            writeln!(f, "Countries: {}", listed.join(", "))?;
        }

        if !self.top.is_empty() {
            writeln!(f, "Top {}:", self.top.len())?;
            for entry in &self.top {
                writeln!(
                    f,
                    "  {:>3}. {:<10} {:<32} {:<3} {}",
                    entry.rank,
                    entry.symbol,
                    truncate(&entry.name, 32),
                    entry.country,
                    format_large_number(entry.market_cap_usd)
                )?;
            }
        }
        Ok(())
    }
}
