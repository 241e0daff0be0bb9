//! Capranker Core - the global market-cap ranking pipeline.
//!
//! Stages, in the order a run drives them:
//! 1. `pipeline::PartitionFetcher` pulls every country partition through a bounded worker pool
//! 2. `screening::RecordValidator` rejects funds, inactive listings and corrupt caps
//! 3. `normalize::CurrencyNormalizer` fixes minor units and converts caps to USD
//! 4. `dedup::Deduplicator` keeps one listing per company by listing tier
//! 5. `enrich::Enricher` refreshes quotes and attaches logos for large caps
//! 6. `ranking::rank` sorts by USD cap and assigns ranks
//!
//! The crate never reads the environment; callers hand it a `PipelineConfig`.

pub mod assets;
pub mod constants;
pub mod dedup;
pub mod enrich;
pub mod errors;
pub mod fx;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod screening;
pub mod sink;
pub mod utils;

pub use assets::*;
pub use pipeline::{PipelineConfig, RankingPipeline, RunReport, RunSummary};
pub use ranking::RankingSnapshot;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
