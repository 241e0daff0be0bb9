use serde::{Deserialize, Serialize};

/// Real-time quote for one listing.
///
/// Prices are in the listing's native currency and native units.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveQuote {
    #[serde(default)]
    pub symbol: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,

    /// Day change in percent (e.g. 1.25 for +1.25%)
    #[serde(default)]
    pub changes_percentage: Option<f64>,

    #[serde(default)]
    pub change: Option<f64>,

    #[serde(default)]
    pub market_cap: Option<f64>,

    #[serde(default)]
    pub volume: Option<f64>,

    #[serde(default)]
    pub open: Option<f64>,

    #[serde(default)]
    pub previous_close: Option<f64>,

    #[serde(default)]
    pub exchange: Option<String>,

    #[serde(default)]
    pub shares_outstanding: Option<f64>,
}

impl LiveQuote {
    /// Shares outstanding and price, when both are usable for a market cap recomputation.
    pub fn cap_inputs(&self) -> Option<(f64, f64)> {
        match (self.shares_outstanding, self.price) {
            (Some(shares), Some(price)) if shares > 0.0 && price > 0.0 => Some((shares, price)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_inputs_require_positive_values() {
        let quote = LiveQuote {
            price: Some(10.0),
            shares_outstanding: Some(1_000.0),
            ..Default::default()
        };
        assert_eq!(quote.cap_inputs(), Some((1_000.0, 10.0)));

        let no_shares = LiveQuote {
            price: Some(10.0),
            shares_outstanding: Some(0.0),
            ..Default::default()
        };
        assert_eq!(no_shares.cap_inputs(), None);

        let no_price = LiveQuote {
            shares_outstanding: Some(1_000.0),
            ..Default::default()
        };
        assert_eq!(no_price.cap_inputs(), None);
    }
}
