use serde::Serialize;

use crate::assets::AssetType;

/// Coarse grouping of drop reasons for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropCategory {
    /// Record-level data problem (implausible value, fund-like, flagged as bad)
    DataQuality,
    /// A second copy of a symbol or of a company
    Duplicate,
    /// Excluded by configuration rather than by its data
    Policy,
}

impl DropCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DropCategory::DataQuality => "data_quality",
            DropCategory::Duplicate => "duplicate",
            DropCategory::Policy => "policy",
        }
    }
}

impl std::fmt::Display for DropCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a record did not make it into the ranking.
///
/// Never fatal: every drop is counted and logged, and the run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingSymbol,
    /// Flagged as ETF/fund, or the name carries a fund lexicon word
    FundLike,
    Inactive,
    NonPositiveCap,
    /// At or above the implausibility ceiling
    CeilingExceeded,
    /// At or below the floor after conversion
    BelowFloor,
    /// Symbol or name on the known-bad list
    KnownBadRecord,
    OtcExcluded,
    /// Same symbol already arrived from another partition
    DuplicateSymbol,
    /// Lost the listing-priority contest for its company
    DuplicateListing,
}

impl DropReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DropReason::MissingSymbol => "missing_symbol",
            DropReason::FundLike => "fund_like",
            DropReason::Inactive => "inactive",
            DropReason::NonPositiveCap => "non_positive_cap",
            DropReason::CeilingExceeded => "ceiling_exceeded",
            DropReason::BelowFloor => "below_floor",
            DropReason::KnownBadRecord => "known_bad_record",
            DropReason::OtcExcluded => "otc_excluded",
            DropReason::DuplicateSymbol => "duplicate_symbol",
            DropReason::DuplicateListing => "duplicate_listing",
        }
    }

    pub const fn category(&self) -> DropCategory {
        match self {
            DropReason::DuplicateSymbol | DropReason::DuplicateListing => DropCategory::Duplicate,
            DropReason::OtcExcluded => DropCategory::Policy,
            _ => DropCategory::DataQuality,
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating one raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep(AssetType),
    Drop(DropReason),
}

impl Verdict {
    pub fn is_keep(&self) -> bool {
        matches!(self, Verdict::Keep(_))
    }

    pub fn reason(&self) -> Option<DropReason> {
        match self {
            Verdict::Keep(_) => None,
            Verdict::Drop(reason) => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(DropReason::CeilingExceeded.category(), DropCategory::DataQuality);
        assert_eq!(DropReason::FundLike.category(), DropCategory::DataQuality);
        assert_eq!(DropReason::DuplicateSymbol.category(), DropCategory::Duplicate);
        assert_eq!(DropReason::OtcExcluded.category(), DropCategory::Policy);
    }

    #[test]
    fn test_verdict_helpers() {
        assert!(Verdict::Keep(AssetType::Reit).is_keep());
        assert_eq!(
            Verdict::Drop(DropReason::Inactive).reason(),
            Some(DropReason::Inactive)
        );
        assert_eq!(Verdict::Keep(AssetType::Stock).reason(), None);
    }
}
