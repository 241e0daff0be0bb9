use serde::Serialize;

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// USD itself, never looked up
    Identity,
    /// Live upstream lookup
    Live,
    /// Static approximate table, used when the live lookup failed or was throttled
    Fallback,
    /// Unknown currency, converted at 1.0
    Unconverted,
}

/// USD value of one unit of `currency`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsdRate {
    pub currency: String,
    pub rate: f64,
    pub source: RateSource,
}

impl UsdRate {
    pub fn identity() -> Self {
        Self {
            currency: crate::constants::USD.to_string(),
            rate: 1.0,
            source: RateSource::Identity,
        }
    }
}
