//! FMP wire structures that do not surface outside the provider.

use serde::Deserialize;

/// One element of the `/v3/fx/{PAIR}` response.
#[derive(Debug, Deserialize)]
pub(super) struct FxQuote {
    #[serde(default)]
    pub price: Option<f64>,
}

/// Error body FMP returns with 200 or 4xx statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(rename = "Error Message")]
    pub message: String,
}
