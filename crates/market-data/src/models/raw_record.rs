use serde::{Deserialize, Serialize};

/// One row of the country-partitioned stock screener.
///
/// Market cap and price are in the listing's native currency and native unit
/// convention (some exchanges quote in minor units). Every field the upstream
/// is known to send as `null` is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Listing symbol, including any exchange suffix (e.g. "VOD.L")
    #[serde(default)]
    pub symbol: String,

    /// Company display name
    #[serde(default)]
    pub company_name: Option<String>,

    /// Market capitalization in native currency and native units
    #[serde(default)]
    pub market_cap: Option<f64>,

    /// Last price in native currency and native units
    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub sector: Option<String>,

    #[serde(default)]
    pub industry: Option<String>,

    #[serde(default)]
    pub volume: Option<f64>,

    /// Long exchange name (e.g. "London Stock Exchange")
    #[serde(default)]
    pub exchange: Option<String>,

    /// Short exchange code (e.g. "LSE", "HKSE", "OTC")
    #[serde(default)]
    pub exchange_short_name: Option<String>,

    /// ISO 3166-1 alpha-2 country of the company
    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub is_etf: Option<bool>,

    #[serde(default)]
    pub is_fund: Option<bool>,

    #[serde(default)]
    pub is_actively_trading: Option<bool>,
}

impl RawRecord {
    /// Company name, empty when the upstream omitted it.
    pub fn name(&self) -> &str {
        self.company_name.as_deref().unwrap_or_default()
    }

    /// Native market cap, zero when missing.
    pub fn native_market_cap(&self) -> f64 {
        self.market_cap.unwrap_or(0.0)
    }

    /// Short exchange code, empty when missing.
    pub fn exchange_code(&self) -> &str {
        self.exchange_short_name.as_deref().unwrap_or_default()
    }

    /// Country code, empty when missing.
    pub fn country_code(&self) -> &str {
        self.country.as_deref().unwrap_or_default()
    }

    /// True when the upstream flags the instrument as an ETF or fund.
    pub fn is_flagged_fund(&self) -> bool {
        self.is_etf.unwrap_or(false) || self.is_fund.unwrap_or(false)
    }

    /// Missing flag means "not trading", matching how the screener omits delisted rows.
    pub fn is_trading(&self) -> bool {
        self.is_actively_trading.unwrap_or(false)
    }
}
