//! Enrichment - best-effort quote refresh and logos for large caps.

mod enricher;

pub use enricher::{EnrichConfig, EnrichOutcome, Enricher};
