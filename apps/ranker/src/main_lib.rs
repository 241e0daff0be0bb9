use std::sync::Arc;

use anyhow::Context;
use capranker_core::screening::Lexicons;
use capranker_core::sink::{CsvFileSink, JsonFileSink, RankingSink};
use capranker_core::{Error as CoreError, PipelineConfig, RankingPipeline, RunReport};
use capranker_market_data::{FmpConfig, FmpProvider, MarketDataSource, RateLimitConfig};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, OutputFormat};

/// Process exit code when the run produced no ranking.
pub const EXIT_NO_DATA: u8 = 1;
/// Process exit code for configuration the run cannot start with.
pub const EXIT_CONFIG: u8 = 2;

/// Text logs by default, JSON with `CAPRANKER_LOG_FORMAT=json`.
/// Library crates log through `log`; the subscriber picks those records up too.
pub fn init_tracing() {
    let log_format = std::env::var("CAPRANKER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

pub fn build_source(config: &Config) -> anyhow::Result<Arc<dyn MarketDataSource>> {
    let fmp_config = FmpConfig {
        timeout: config.request_timeout,
        rate_limit_backoff: config.rate_limit_backoff,
        min_delay: config.worker_spacing,
        rate_limit: RateLimitConfig::per_minute(config.requests_per_minute),
        ..FmpConfig::new(config.api_key.clone()).with_base_url(config.base_url.clone())
    };
    let provider = FmpProvider::new(fmp_config).context("creating FMP client")?;
    Ok(Arc::new(provider))
}

pub fn build_pipeline_config(config: &Config) -> anyhow::Result<PipelineConfig> {
    let lexicons = match &config.lexicons_path {
        Some(path) => {
            tracing::info!("Loading lexicons from {}", path.display());
            Lexicons::from_path(path)
                .with_context(|| format!("loading lexicons from {}", path.display()))?
        }
        None => Lexicons::embedded(),
    };

    let pipeline_config = PipelineConfig {
        partition_workers: config.partition_workers,
        enrich_workers: config.enrich_workers,
        worker_spacing: config.worker_spacing,
        // Room for one throttled attempt, the backoff and the retry
        unit_timeout: config.request_timeout * 2 + config.rate_limit_backoff,
        market_cap_floor: config.market_cap_floor,
        market_cap_ceiling: config.market_cap_ceiling,
        profile_threshold: config.profile_threshold,
        refresh_quotes: config.refresh_quotes,
        exclude_otc: config.exclude_otc,
        prefetch_rates: config.prefetch_rates,
        dedup_key: config.dedup_key,
        lexicons: Arc::new(lexicons),
        ..PipelineConfig::default()
    };
    pipeline_config.validate()?;
    Ok(pipeline_config)
}

pub fn build_sinks(config: &Config) -> Vec<Arc<dyn RankingSink>> {
    config
        .output_formats
        .iter()
        .map(|format| -> Arc<dyn RankingSink> {
            match format {
                OutputFormat::Json => Arc::new(JsonFileSink::new(&config.output_dir)),
                OutputFormat::Csv => Arc::new(CsvFileSink::new(&config.output_dir)),
            }
        })
        .collect()
}

/// Run the pipeline once and hand the snapshot to every configured sink.
pub async fn run(config: &Config) -> anyhow::Result<RunReport> {
    let source = build_source(config)?;
    let pipeline = RankingPipeline::new(source, build_pipeline_config(config)?);

    let report = pipeline.run().await?;

    for sink in build_sinks(config) {
        sink.write(&report.snapshot)
            .await
            .with_context(|| format!("writing {} output", sink.name()))?;
    }
    Ok(report)
}

/// Exit code for a failed [`run`].
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<CoreError>() {
        Some(CoreError::InvalidConfigValue(_)) => EXIT_CONFIG,
        _ => EXIT_NO_DATA,
    }
}
