//! Asset domain models.

use serde::{Deserialize, Serialize};

/// Instrument sub-type carried into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Stock,
    Reit,
}

impl AssetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Reit => "reit",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical company name used as the dedup key.
///
/// Trims, collapses inner whitespace and uppercases, so "Shell  plc" and
/// "SHELL PLC" collapse to one company.
pub fn canonical_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// One listing after validation and currency normalization.
///
/// Only `market_cap_usd` is in USD. `price` and `previous_close` stay in the
/// listing's own currency, corrected to major units. A price the upstream
/// never sent stays `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAsset {
    pub symbol: String,
    pub name: String,
    pub market_cap_usd: f64,
    pub price: Option<f64>,
    pub previous_close: Option<f64>,
    pub percent_change: Option<f64>,
    pub volume: Option<f64>,
    pub exchange: String,
    pub country: String,
    pub sector: String,
    pub industry: String,
    pub asset_type: AssetType,
    pub image: Option<String>,

    /// Native currency the cap was converted from
    pub currency: String,
    /// USD value of one unit of `currency` used for the conversion
    pub fx_rate: f64,
    /// 100.0 for minor-unit quoted listings, else 1.0
    pub minor_unit_divisor: f64,
}

impl NormalizedAsset {
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.name)
    }

    pub fn is_otc(&self) -> bool {
        self.exchange.is_empty() || self.exchange.to_uppercase().contains("OTC")
    }
}

/// A normalized asset with its final position. Rank is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAsset {
    pub rank: usize,
    #[serde(flatten)]
    pub asset: NormalizedAsset,
}
