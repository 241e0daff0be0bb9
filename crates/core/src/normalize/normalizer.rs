use std::sync::Arc;

use capranker_market_data::{detect_currency, DetectionSource, RawRecord};
use log::{debug, warn};

use crate::assets::{AssetType, NormalizedAsset};
use crate::fx::ExchangeRateCache;
use crate::screening::{DropReason, Lexicons, MarketCapBounds};

/// Converts validated raw records into USD-denominated assets.
///
/// Steps per record:
/// 1. detect the native currency (suffix first, then country)
/// 2. divide price and cap by 100 for minor-unit quoted listings
/// 3. convert the cap with the run's [`ExchangeRateCache`]
/// 4. drop known-bad records and caps outside the bounds
///
/// Price stays in the native currency. A listing whose currency cannot be
/// resolved is treated as USD and logged, not dropped.
pub struct CurrencyNormalizer {
    rates: Arc<ExchangeRateCache>,
    lexicons: Arc<Lexicons>,
    bounds: MarketCapBounds,
    exclude_otc: bool,
}

impl CurrencyNormalizer {
    pub fn new(
        rates: Arc<ExchangeRateCache>,
        lexicons: Arc<Lexicons>,
        bounds: MarketCapBounds,
        exclude_otc: bool,
    ) -> Self {
        Self {
            rates,
            lexicons,
            bounds,
            exclude_otc,
        }
    }

    pub async fn normalize(
        &self,
        record: &RawRecord,
        asset_type: AssetType,
    ) -> Result<NormalizedAsset, DropReason> {
        let symbol = record.symbol.trim();
        let name = record.name().trim();

        if self.lexicons.is_known_bad(symbol, name) {
            warn!("Skipping known problem record {} ({})", symbol, name);
            return Err(DropReason::KnownBadRecord);
        }

        let exchange = record.exchange_code().trim();
        let detection = detect_currency(symbol, record.country_code(), exchange);
        if detection.source == DetectionSource::Default {
            warn!(
                "No currency resolved for {} (country '{}'), assuming USD",
                symbol,
                record.country_code()
            );
        }

        let divisor = detection.minor_unit_divisor;
        let native_cap = record.native_market_cap() / divisor;
        if detection.is_minor_unit() {
            debug!(
                "{}: minor-unit listing, cap {} -> {} {}",
                symbol,
                record.native_market_cap(),
                native_cap,
                detection.currency
            );
        }

        let fx_rate = self.rates.rate(&detection.currency).await;
        let market_cap_usd = native_cap * fx_rate;

        if let Err(reason) = self.bounds.check(market_cap_usd) {
            match reason {
                DropReason::CeilingExceeded => warn!(
                    "Skipping {}: converted market cap ${:.1}T is implausible",
                    symbol,
                    market_cap_usd / 1e12
                ),
                _ => debug!("Skipping {}: {} (${:.0})", symbol, reason, market_cap_usd),
            }
            return Err(reason);
        }

        let asset = NormalizedAsset {
            symbol: symbol.to_string(),
            name: name.to_string(),
            market_cap_usd,
            price: record.price.map(|price| price / divisor),
            previous_close: None,
            percent_change: None,
            volume: record.volume,
            exchange: exchange.to_string(),
            country: record.country_code().trim().to_uppercase(),
            sector: record.sector.clone().unwrap_or_default(),
            industry: record.industry.clone().unwrap_or_default(),
            asset_type,
            image: None,
            currency: detection.currency,
            fx_rate,
            minor_unit_divisor: divisor,
        };

        if self.exclude_otc && asset.is_otc() {
            debug!("Skipping OTC listing {} (exchange '{}')", symbol, exchange);
            return Err(DropReason::OtcExcluded);
        }

        Ok(asset)
    }
}
