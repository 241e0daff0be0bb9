use std::sync::Arc;
use std::time::Duration;

use capranker_market_data::{default_partitions, PartitionQuery};
use chrono::NaiveDate;

use crate::constants::{
    DEFAULT_ENRICH_WORKERS, DEFAULT_MARKET_CAP_CEILING, DEFAULT_MARKET_CAP_FLOOR,
    DEFAULT_PARTITION_WORKERS, DEFAULT_PROFILE_THRESHOLD, DEFAULT_UNIT_TIMEOUT_SECS,
    DEFAULT_WORKER_SPACING_MS,
};
use crate::dedup::DedupKey;
use crate::errors::{Error, Result};
use crate::screening::{Lexicons, MarketCapBounds};

/// Everything one pipeline run needs besides the upstream source.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Markets to scan. The run applies `market_cap_floor` to every query.
    pub partitions: Vec<PartitionQuery>,
    pub partition_workers: usize,
    pub enrich_workers: usize,
    /// Minimum gap between one worker's consecutive upstream calls
    pub worker_spacing: Duration,
    /// Timeout for one partition fetch or one record's enrichment
    pub unit_timeout: Duration,
    pub market_cap_floor: f64,
    pub market_cap_ceiling: f64,
    pub profile_threshold: f64,
    pub refresh_quotes: bool,
    pub exclude_otc: bool,
    /// Warm the rate cache with the common currencies before normalizing
    pub prefetch_rates: bool,
    pub dedup_key: DedupKey,
    pub lexicons: Arc<Lexicons>,
    /// Fixed snapshot date; `None` means today in New York
    pub snapshot_date: Option<NaiveDate>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            partitions: default_partitions(),
            partition_workers: DEFAULT_PARTITION_WORKERS,
            enrich_workers: DEFAULT_ENRICH_WORKERS,
            worker_spacing: Duration::from_millis(DEFAULT_WORKER_SPACING_MS),
            unit_timeout: Duration::from_secs(DEFAULT_UNIT_TIMEOUT_SECS),
            market_cap_floor: DEFAULT_MARKET_CAP_FLOOR,
            market_cap_ceiling: DEFAULT_MARKET_CAP_CEILING,
            profile_threshold: DEFAULT_PROFILE_THRESHOLD,
            refresh_quotes: true,
            exclude_otc: false,
            prefetch_rates: true,
            dedup_key: DedupKey::default(),
            lexicons: Arc::new(Lexicons::embedded()),
            snapshot_date: None,
        }
    }
}

impl PipelineConfig {
    pub fn bounds(&self) -> MarketCapBounds {
        MarketCapBounds::new(self.market_cap_floor, self.market_cap_ceiling)
    }

    /// Partition queries with the configured floor applied.
    pub fn partition_queries(&self) -> Vec<PartitionQuery> {
        self.partitions
            .iter()
            .cloned()
            .map(|query| query.with_floor(self.market_cap_floor))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.partitions.is_empty() {
            return Err(Error::InvalidConfigValue(
                "at least one partition is required".to_string(),
            ));
        }
        if self.partition_workers == 0 || self.enrich_workers == 0 {
            return Err(Error::InvalidConfigValue(
                "worker pools need at least one worker".to_string(),
            ));
        }
        if !self.market_cap_floor.is_finite()
            || !self.market_cap_ceiling.is_finite()
            || self.market_cap_floor < 0.0
            || self.market_cap_floor >= self.market_cap_ceiling
        {
            return Err(Error::InvalidConfigValue(format!(
                "market cap bounds must satisfy 0 <= floor < ceiling (floor {}, ceiling {})",
                self.market_cap_floor, self.market_cap_ceiling
            )));
        }
        if self.unit_timeout.is_zero() {
            return Err(Error::InvalidConfigValue(
                "unit timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
