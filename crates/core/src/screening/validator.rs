use std::sync::Arc;

use capranker_market_data::{detect_currency, RawRecord};

use super::{DropReason, Lexicons, Verdict};
use crate::assets::AssetType;
use crate::constants::{DEFAULT_MARKET_CAP_CEILING, USD};

/// Pure per-record filter run before any currency conversion.
///
/// Filters apply in order: missing symbol, fund-like (upstream flag or a
/// fund lexicon word in the name), not actively trading, non-positive cap,
/// and finally an early ceiling check for records already denominated in
/// USD. Survivors are classified as stock or REIT.
#[derive(Debug, Clone)]
pub struct RecordValidator {
    lexicons: Arc<Lexicons>,
    ceiling: f64,
}

impl RecordValidator {
    pub fn new(lexicons: Arc<Lexicons>, ceiling: f64) -> Self {
        Self { lexicons, ceiling }
    }

    pub fn validate(&self, record: &RawRecord) -> Verdict {
        if record.symbol.trim().is_empty() {
            return Verdict::Drop(DropReason::MissingSymbol);
        }

        let name = record.name();
        if record.is_flagged_fund() || self.lexicons.is_fund_name(name) {
            return Verdict::Drop(DropReason::FundLike);
        }

        if !record.is_trading() {
            return Verdict::Drop(DropReason::Inactive);
        }

        let cap = record.native_market_cap();
        if cap.is_nan() || cap <= 0.0 {
            return Verdict::Drop(DropReason::NonPositiveCap);
        }

        let detection = detect_currency(&record.symbol, record.country_code(), record.exchange_code());
        if detection.currency == USD && !detection.is_minor_unit() && cap >= self.ceiling {
            return Verdict::Drop(DropReason::CeilingExceeded);
        }

        if self.lexicons.is_reit_name(name) {
            Verdict::Keep(AssetType::Reit)
        } else {
            Verdict::Keep(AssetType::Stock)
        }
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(Arc::new(Lexicons::embedded()), DEFAULT_MARKET_CAP_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, name: &str, cap: f64) -> RawRecord {
        RawRecord {
            symbol: symbol.to_string(),
            company_name: Some(name.to_string()),
            market_cap: Some(cap),
            price: Some(100.0),
            exchange_short_name: Some("NYSE".to_string()),
            country: Some("US".to_string()),
            is_etf: Some(false),
            is_fund: Some(false),
            is_actively_trading: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_keeps_regular_stock() {
        let validator = RecordValidator::default();
        assert_eq!(
            validator.validate(&record("JPM", "JPMorgan Chase & Co.", 6e11)),
            Verdict::Keep(AssetType::Stock)
        );
    }

    #[test]
    fn test_classifies_reit() {
        let validator = RecordValidator::default();
        assert_eq!(
            validator.validate(&record("XYZ", "Example Office REIT", 2e9)),
            Verdict::Keep(AssetType::Reit)
        );
    }

    #[test]
    fn test_drops_flagged_and_named_funds() {
        let validator = RecordValidator::default();

        let mut flagged = record("QQQ", "Invesco QQQ Trust", 2e11);
        flagged.is_etf = Some(true);
        assert_eq!(validator.validate(&flagged), Verdict::Drop(DropReason::FundLike));

        let mut fund = record("ABC", "Abc Holdings", 2e9);
        fund.is_fund = Some(true);
        assert_eq!(validator.validate(&fund), Verdict::Drop(DropReason::FundLike));

        let named = record("SPY", "SPDR S&P 500 ETF Trust", 5e11);
        assert_eq!(validator.validate(&named), Verdict::Drop(DropReason::FundLike));
    }

    #[test]
    fn test_lexicon_does_not_match_substrings() {
        let validator = RecordValidator::default();
        let verdict = validator.validate(&record("FUND", "Fundamental Research Corp", 1e9));
        assert!(verdict.is_keep());
    }

    #[test]
    fn test_drops_inactive_before_cap_checks() {
        let validator = RecordValidator::default();
        let mut inactive = record("OLD", "Old Corp", -1.0);
        inactive.is_actively_trading = Some(false);
        assert_eq!(validator.validate(&inactive), Verdict::Drop(DropReason::Inactive));

        let mut unknown = record("OLD", "Old Corp", 1e9);
        unknown.is_actively_trading = None;
        assert_eq!(validator.validate(&unknown), Verdict::Drop(DropReason::Inactive));
    }

    #[test]
    fn test_drops_non_positive_and_missing_cap() {
        let validator = RecordValidator::default();
        assert_eq!(
            validator.validate(&record("ZERO", "Zero Corp", 0.0)),
            Verdict::Drop(DropReason::NonPositiveCap)
        );

        let mut missing = record("NONE", "None Corp", 1.0);
        missing.market_cap = None;
        assert_eq!(validator.validate(&missing), Verdict::Drop(DropReason::NonPositiveCap));

        let mut nan = record("NAN", "Nan Corp", 1.0);
        nan.market_cap = Some(f64::NAN);
        assert_eq!(validator.validate(&nan), Verdict::Drop(DropReason::NonPositiveCap));
    }

    #[test]
    fn test_usd_prefilter_rejects_implausible_caps() {
        let validator = RecordValidator::default();
        assert_eq!(
            validator.validate(&record("BIG", "Corrupt Corp", 9e12)),
            Verdict::Drop(DropReason::CeilingExceeded)
        );
    }

    #[test]
    fn test_usd_prefilter_skips_native_currency_records() {
        let validator = RecordValidator::default();
        let mut yen = record("7203.T", "Toyota Motor Corporation", 4.5e13);
        yen.country = Some("JP".to_string());
        yen.exchange_short_name = Some("JPX".to_string());
        assert_eq!(validator.validate(&yen), Verdict::Keep(AssetType::Stock));
    }

    #[test]
    fn test_missing_symbol() {
        let validator = RecordValidator::default();
        assert_eq!(
            validator.validate(&record("  ", "Nameless", 1e9)),
            Verdict::Drop(DropReason::MissingSymbol)
        );
    }
}
