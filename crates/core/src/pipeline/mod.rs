//! Pipeline orchestration: fetch, screen, normalize, dedup, enrich, rank.

mod partition_fetcher;
mod pipeline_config;
mod ranking_pipeline;
mod run_summary;

pub use partition_fetcher::{FailedPartition, FetchReport, PartitionFetcher};
pub use pipeline_config::PipelineConfig;
pub use ranking_pipeline::{RankingPipeline, RunReport};
pub use run_summary::{RunSummary, TopEntry};
