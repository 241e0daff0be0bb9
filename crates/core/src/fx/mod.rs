//! FX (Foreign Exchange) module - per-run USD conversion rates.

mod exchange_rate_cache;
mod fx_model;

pub use exchange_rate_cache::ExchangeRateCache;
pub use fx_model::{RateSource, UsdRate};
