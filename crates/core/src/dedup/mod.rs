//! Deduplication - one symbol per arrival, one listing per company.

mod deduplicator;
mod listing_tier;

pub use deduplicator::{first_arrival_by_symbol, DedupKey, DedupOutcome, Deduplicator};
pub use listing_tier::{listing_tier, ListingTier};
