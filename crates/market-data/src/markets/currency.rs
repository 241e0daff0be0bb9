use serde::Serialize;

use super::{country_currency, minor_unit_exchange, suffix_rule};

/// Where a detected currency came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// The symbol's exchange suffix (e.g. ".L")
    Suffix,
    /// The company's country code
    Country,
    /// Nothing matched; USD assumed
    Default,
}

/// Native currency and unit convention of one listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrencyDetection {
    pub currency: String,
    pub source: DetectionSource,
    /// 100.0 for minor-unit quoted listings (pence, cents, agorot), else 1.0
    pub minor_unit_divisor: f64,
}

impl CurrencyDetection {
    pub fn is_minor_unit(&self) -> bool {
        self.minor_unit_divisor > 1.0
    }
}

/// Detect the native currency of a listing.
///
/// A recognised symbol suffix wins over the country code, since the same
/// company can be cross-listed away from home. Minor-unit pricing is flagged
/// either by the suffix rule or by an exchange code marker for the detected
/// currency (e.g. `LSE` with GBP).
///
/// # Examples
///
/// ```
/// use capranker_market_data::markets::{detect_currency, DetectionSource};
///
/// let detection = detect_currency("VOD.L", "GB", "LSE");
/// assert_eq!(detection.currency, "GBP");
/// assert_eq!(detection.source, DetectionSource::Suffix);
/// assert_eq!(detection.minor_unit_divisor, 100.0);
///
/// let detection = detect_currency("7203.T", "US", "NYSE");
/// assert_eq!(detection.currency, "JPY");
/// ```
pub fn detect_currency(symbol: &str, country: &str, exchange: &str) -> CurrencyDetection {
    let by_suffix = symbol
        .trim()
        .rsplit_once('.')
        .and_then(|(_, suffix)| suffix_rule(suffix));

    let (currency, source, suffix_minor) = match by_suffix {
        Some(rule) => (rule.currency.clone(), DetectionSource::Suffix, rule.minor_unit),
        None => match country_currency(country) {
            Some(currency) => (currency.to_string(), DetectionSource::Country, false),
            None => ("USD".to_string(), DetectionSource::Default, false),
        },
    };

    let minor = suffix_minor || minor_unit_exchange(exchange, &currency);

    CurrencyDetection {
        currency,
        source,
        minor_unit_divisor: if minor { 100.0 } else { 1.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_detection() {
        let cases = [
            ("NPN.JO", "ZAR"),
            ("0700.HK", "HKD"),
            ("2222.SR", "SAR"),
            ("005930.KS", "KRW"),
            ("035720.KQ", "KRW"),
            ("7203.T", "JPY"),
            ("HSBA.L", "GBP"),
            ("TEVA.TA", "ILS"),
            ("RY.TO", "CAD"),
            ("BHP.AX", "AUD"),
            ("RELIANCE.NS", "INR"),
            ("600519.SS", "CNY"),
            ("MC.PA", "EUR"),
            ("SAP.DE", "EUR"),
            ("NESN.SW", "CHF"),
            ("PETR4.SA", "BRL"),
        ];

        for (symbol, expected) in cases {
            let detection = detect_currency(symbol, "", "");
            assert_eq!(detection.currency, expected, "{}", symbol);
            assert_eq!(detection.source, DetectionSource::Suffix);
        }
    }

    #[test]
    fn test_suffix_beats_country() {
        let detection = detect_currency("SHEL.L", "NL", "LSE");
        assert_eq!(detection.currency, "GBP");
        assert_eq!(detection.source, DetectionSource::Suffix);
    }

    #[test]
    fn test_country_fallback() {
        let detection = detect_currency("ASML", "NL", "NASDAQ");
        assert_eq!(detection.currency, "EUR");
        assert_eq!(detection.source, DetectionSource::Country);
        assert!(!detection.is_minor_unit());

        let detection = detect_currency("AAPL", "us", "NASDAQ");
        assert_eq!(detection.currency, "USD");
        assert_eq!(detection.source, DetectionSource::Country);
    }

    #[test]
    fn test_unknown_defaults_to_usd() {
        let detection = detect_currency("FOO", "ZZ", "");
        assert_eq!(detection.currency, "USD");
        assert_eq!(detection.source, DetectionSource::Default);
        assert_eq!(detection.minor_unit_divisor, 1.0);
    }

    #[test]
    fn test_unknown_suffix_falls_through_to_country() {
        let detection = detect_currency("BRK.B", "US", "NYSE");
        assert_eq!(detection.currency, "USD");
        assert_eq!(detection.source, DetectionSource::Country);
    }

    #[test]
    fn test_minor_unit_by_suffix() {
        for symbol in ["BP.L", "NPN.JO", "TEVA.TA"] {
            assert!(detect_currency(symbol, "", "").is_minor_unit(), "{}", symbol);
        }
        assert!(!detect_currency("0700.HK", "", "").is_minor_unit());
        assert!(!detect_currency("7203.T", "", "").is_minor_unit());
    }

    #[test]
    fn test_minor_unit_by_exchange() {
        let detection = detect_currency("BARC", "GB", "LSE");
        assert_eq!(detection.currency, "GBP");
        assert!(detection.is_minor_unit());

        // A dollar line on London is not quoted in pence
        let detection = detect_currency("XOM", "US", "LSE");
        assert_eq!(detection.currency, "USD");
        assert!(!detection.is_minor_unit());
    }
}
