use serde::{Deserialize, Serialize};

/// A country-scoped screener query.
///
/// One partition is one national market. The fetcher attempts each partition
/// exactly once; a failed partition contributes zero records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionQuery {
    /// ISO 3166-1 alpha-2 country code sent to the screener
    pub country: String,

    /// Human-readable market name used in logs and summaries
    pub label: String,

    /// Minimum market cap passed to the screener (upstream applies it in USD)
    pub market_cap_floor: f64,

    /// Maximum number of rows requested
    pub limit: u32,
}

impl PartitionQuery {
    pub fn new(country: impl Into<String>, label: impl Into<String>, limit: u32) -> Self {
        Self {
            country: country.into(),
            label: label.into(),
            market_cap_floor: crate::markets::DEFAULT_MARKET_CAP_FLOOR,
            limit,
        }
    }

    /// Override the market cap floor.
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.market_cap_floor = floor;
        self
    }

    /// Screener query parameters, excluding the API key.
    ///
    /// Results are requested sorted by market cap, descending, and limited
    /// to actively trading instruments.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("marketCapMoreThan", format!("{:.0}", self.market_cap_floor)),
            ("limit", self.limit.to_string()),
            ("country", self.country.clone()),
            ("order", "desc".to_string()),
            ("sortBy", "marketcap".to_string()),
            ("isActivelyTrading", "true".to_string()),
        ]
    }
}

impl std::fmt::Display for PartitionQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.country)
    }
}
