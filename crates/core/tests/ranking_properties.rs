//! Property-based tests for ranking, dedup and the market cap bounds.
//!
//! These tests verify that the output invariants hold for arbitrary upstream
//! data, using the `proptest` crate for random test case generation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use capranker_core::assets::{canonical_name, AssetType, NormalizedAsset};
use capranker_core::dedup::{DedupKey, Deduplicator};
use capranker_core::ranking::rank;
use capranker_core::screening::{Lexicons, MarketCapBounds};
use capranker_core::{PipelineConfig, RankingPipeline};
use capranker_market_data::{
    MarketDataSource, PartitionQuery, RateLimit, RawRecord, UpstreamError,
};
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

fn arb_exchange() -> impl Strategy<Value = (&'static str, &'static str, &'static str)> {
    // (suffix, exchange, country)
    prop_oneof![
        Just(("", "NYSE", "US")),
        Just(("", "NASDAQ", "US")),
        Just(("", "OTC", "US")),
        Just((".L", "LSE", "GB")),
        Just((".HK", "HKSE", "HK")),
        Just((".HK", "HKSE", "CN")),
        Just((".T", "JPX", "JP")),
        Just((".DE", "XETRA", "DE")),
        Just((".AX", "ASX", "AU")),
        Just((".NS", "NSE", "IN")),
    ]
}

/// Names come from a small pool so duplicate companies are common.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Acme Corp".to_string()),
        Just("ACME  corp".to_string()),
        Just("Globex Holdings".to_string()),
        Just("Initech".to_string()),
        Just("Umbrella Group".to_string()),
        "[A-Z][a-z]{3,8} (Inc|plc|AG|Ltd)",
    ]
}

fn arb_cap() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None::<f64>),
        1 => Just(Some(0.0f64)),
        2 => (1e6f64..1e8).prop_map(Some),
        8 => (1e8f64..2e13).prop_map(Some),
    ]
}

fn arb_record() -> impl Strategy<Value = RawRecord> {
    (
        "[A-Z]{2,5}",
        arb_exchange(),
        arb_name(),
        arb_cap(),
        proptest::option::of(any::<bool>()),
        prop::bool::weighted(0.9),
    )
        .prop_map(|(ticker, (suffix, exchange, country), name, cap, etf, trading)| RawRecord {
            symbol: format!("{}{}", ticker, suffix),
            company_name: Some(name),
            market_cap: cap,
            price: Some(42.0),
            exchange_short_name: Some(exchange.to_string()),
            country: Some(country.to_string()),
            is_etf: etf,
            is_actively_trading: Some(trading),
            ..Default::default()
        })
}

fn arb_asset() -> impl Strategy<Value = NormalizedAsset> {
    (arb_record(), 5e7f64..5e12).prop_map(|(record, cap)| NormalizedAsset {
        symbol: record.symbol.clone(),
        name: record.name().to_string(),
        market_cap_usd: cap,
        price: Some(42.0),
        previous_close: None,
        percent_change: None,
        volume: None,
        exchange: record.exchange_code().to_string(),
        country: record.country_code().to_string(),
        sector: String::new(),
        industry: String::new(),
        asset_type: AssetType::Stock,
        image: None,
        currency: "USD".to_string(),
        fx_rate: 1.0,
        minor_unit_divisor: 1.0,
    })
}

// =============================================================================
// Upstream stub
// =============================================================================

struct StubUpstream {
    records: Vec<RawRecord>,
}

#[async_trait]
impl MarketDataSource for StubUpstream {
    fn id(&self) -> &'static str {
        "STUB"
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::unlimited()
    }

    async fn fetch_partition(
        &self,
        _query: &PartitionQuery,
    ) -> Result<Vec<RawRecord>, UpstreamError> {
        Ok(self.records.clone())
    }

    async fn get_usd_rate(&self, currency: &str) -> Result<f64, UpstreamError> {
        Err(UpstreamError::RateLimited {
            endpoint: format!("/v3/fx/{}USD", currency),
        })
    }
}

fn run_pipeline(records: Vec<RawRecord>) -> capranker_core::RunReport {
    let config = PipelineConfig {
        partitions: vec![PartitionQuery::new("ZZ", "Everywhere", 5000)],
        worker_spacing: Duration::ZERO,
        refresh_quotes: false,
        prefetch_rates: false,
        ..Default::default()
    };
    let pipeline = RankingPipeline::new(Arc::new(StubUpstream { records }), config);

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(pipeline.run())
        .unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Ranks are 1..=n and market caps never increase down the list.
    #[test]
    fn prop_ranking_is_monotonic(assets in prop::collection::vec(arb_asset(), 0..60)) {
        let ranked = rank(assets.clone());
        prop_assert_eq!(ranked.len(), assets.len());
        for (index, entry) in ranked.iter().enumerate() {
            prop_assert_eq!(entry.rank, index + 1);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].asset.market_cap_usd >= pair[1].asset.market_cap_usd);
        }
    }

    /// After dedup no two assets share a canonical name, and every input name survives once.
    #[test]
    fn prop_dedup_leaves_unique_names(assets in prop::collection::vec(arb_asset(), 0..60)) {
        let distinct: HashSet<String> = assets.iter().map(|a| canonical_name(&a.name)).collect();
        let deduplicator = Deduplicator::new(Arc::new(Lexicons::embedded()), DedupKey::Name);

        let outcome = deduplicator.dedup(assets.clone());

        let kept: HashSet<String> = outcome.kept.iter().map(|a| canonical_name(&a.name)).collect();
        prop_assert_eq!(kept.len(), outcome.kept.len());
        prop_assert_eq!(kept, distinct);
        prop_assert_eq!(outcome.kept.len() + outcome.dropped.len(), assets.len());
    }

    /// Bounds accept exactly the open interval (floor, ceiling).
    #[test]
    fn prop_bounds_are_open_interval(cap in prop_oneof![
        Just(f64::NAN),
        Just(f64::INFINITY),
        -1e13f64..1e14,
    ]) {
        let bounds = MarketCapBounds::default();
        let inside = cap > bounds.floor && cap < bounds.ceiling;
        prop_assert_eq!(bounds.contains(cap), inside);
    }

    /// Whatever the upstream sends, the published ranking satisfies every output invariant.
    #[test]
    fn prop_pipeline_output_invariants(records in prop::collection::vec(arb_record(), 1..80)) {
        let report = run_pipeline(records);
        let assets = &report.snapshot.assets;

        let mut names = HashSet::new();
        for entry in assets {
            let cap = entry.asset.market_cap_usd;
            prop_assert!(cap > 50_000_000.0 && cap < 5_000_000_000_000.0);
            prop_assert!(names.insert(canonical_name(&entry.asset.name)));
        }
        for pair in assets.windows(2) {
            prop_assert!(pair[0].asset.market_cap_usd >= pair[1].asset.market_cap_usd);
        }

        let summary = &report.summary;
        prop_assert_eq!(
            summary.records_attempted,
            summary.records_kept + summary.dropped_total()
        );
    }
}
