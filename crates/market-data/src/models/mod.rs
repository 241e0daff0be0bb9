//! Market data models
//!
//! This module contains the wire-level data types exchanged with the upstream:
//! - `raw_record` - One screener row (RawRecord)
//! - `quote` - Real-time quote data (LiveQuote)
//! - `profile` - Company profile data (CompanyProfile)
//! - `partition` - Country-scoped screener query (PartitionQuery)

mod partition;
mod profile;
mod quote;
mod raw_record;

pub use partition::PartitionQuery;
pub use profile::CompanyProfile;
pub use quote::LiveQuote;
pub use raw_record::RawRecord;
