use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use capranker_core::constants::{
    DEFAULT_ENRICH_WORKERS, DEFAULT_MARKET_CAP_CEILING, DEFAULT_MARKET_CAP_FLOOR,
    DEFAULT_PARTITION_WORKERS, DEFAULT_PROFILE_THRESHOLD, DEFAULT_WORKER_SPACING_MS,
};
use capranker_core::dedup::DedupKey;
use capranker_market_data::provider::fmp::DEFAULT_BASE_URL;
use capranker_market_data::throttle::DEFAULT_REQUESTS_PER_MINUTE;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("FMP_API_KEY is not set")]
    MissingApiKey,

    #[error("Invalid {var}: '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("Market cap bounds must satisfy 0 <= floor < ceiling (floor {floor}, ceiling {ceiling})")]
    Bounds { floor: f64, ceiling: f64 },
}

/// Output file formats written after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(()),
        }
    }
}

pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub partition_workers: usize,
    pub enrich_workers: usize,
    pub worker_spacing: Duration,
    pub requests_per_minute: u32,
    pub request_timeout: Duration,
    pub rate_limit_backoff: Duration,
    pub market_cap_floor: f64,
    pub market_cap_ceiling: f64,
    pub profile_threshold: f64,
    pub refresh_quotes: bool,
    pub prefetch_rates: bool,
    pub exclude_otc: bool,
    pub dedup_key: DedupKey,
    pub lexicons_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub output_formats: Vec<OutputFormat>,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var("FMP_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let output_formats = match var("CAPRANKER_OUTPUT_FORMATS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse().map_err(|_| ConfigError::Invalid {
                        var: "CAPRANKER_OUTPUT_FORMATS",
                        value: raw.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![OutputFormat::Json, OutputFormat::Csv],
        };

        let dedup_key = match var("CAPRANKER_DEDUP_KEY") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "CAPRANKER_DEDUP_KEY",
                value: raw,
            })?,
            None => DedupKey::default(),
        };

        let config = Self {
            api_key,
            base_url: var("CAPRANKER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            partition_workers: parse(&var, "CAPRANKER_PARTITION_WORKERS", DEFAULT_PARTITION_WORKERS)?,
            enrich_workers: parse(&var, "CAPRANKER_ENRICH_WORKERS", DEFAULT_ENRICH_WORKERS)?,
            worker_spacing: Duration::from_millis(parse(
                &var,
                "CAPRANKER_WORKER_SPACING_MS",
                DEFAULT_WORKER_SPACING_MS,
            )?),
            requests_per_minute: parse(
                &var,
                "CAPRANKER_REQUESTS_PER_MINUTE",
                DEFAULT_REQUESTS_PER_MINUTE,
            )?,
            request_timeout: Duration::from_millis(parse(
                &var,
                "CAPRANKER_REQUEST_TIMEOUT_MS",
                30_000u64,
            )?),
            rate_limit_backoff: Duration::from_millis(parse(
                &var,
                "CAPRANKER_RATE_LIMIT_BACKOFF_MS",
                1_000u64,
            )?),
            market_cap_floor: parse(&var, "CAPRANKER_MARKET_CAP_FLOOR", DEFAULT_MARKET_CAP_FLOOR)?,
            market_cap_ceiling: parse(
                &var,
                "CAPRANKER_MARKET_CAP_CEILING",
                DEFAULT_MARKET_CAP_CEILING,
            )?,
            profile_threshold: parse(
                &var,
                "CAPRANKER_PROFILE_THRESHOLD",
                DEFAULT_PROFILE_THRESHOLD,
            )?,
            refresh_quotes: parse(&var, "CAPRANKER_REFRESH_QUOTES", true)?,
            prefetch_rates: parse(&var, "CAPRANKER_PREFETCH_RATES", true)?,
            exclude_otc: parse(&var, "CAPRANKER_EXCLUDE_OTC", false)?,
            dedup_key,
            lexicons_path: var("CAPRANKER_LEXICONS_PATH").map(PathBuf::from),
            output_dir: var("CAPRANKER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./output")),
            output_formats,
        };
        config.check_bounds()?;
        Ok(config)
    }

    fn check_bounds(&self) -> Result<(), ConfigError> {
        let (floor, ceiling) = (self.market_cap_floor, self.market_cap_ceiling);
        if floor.is_finite() && ceiling.is_finite() && floor >= 0.0 && floor < ceiling {
            Ok(())
        } else {
            Err(ConfigError::Bounds { floor, ceiling })
        }
    }
}

fn parse<T, V>(var: &V, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            var: key,
            value: raw,
        }),
        None => Ok(default),
    }
}
