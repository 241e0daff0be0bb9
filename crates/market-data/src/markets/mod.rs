//! JSON-driven market catalog.
//!
//! Loads `markets.json` at compile time via `include_str!` and builds lookup
//! indexes once via `lazy_static`. The catalog holds:
//! - symbol suffix → currency rules, with minor-unit flags
//! - exchange-code markers that imply minor-unit pricing
//! - country → currency fallback table
//! - static USD fallback rates and the pre-fetch currency list
//! - the default country partitions

mod currency;

pub use currency::{detect_currency, CurrencyDetection, DetectionSource};

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::models::PartitionQuery;

/// Screener floor applied to every default partition (USD).
pub const DEFAULT_MARKET_CAP_FLOOR: f64 = 50_000_000.0;

// ── JSON schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MarketCatalog {
    default_market_cap_floor: f64,
    suffixes: Vec<SuffixRule>,
    minor_unit_exchanges: Vec<MinorUnitExchange>,
    country_currencies: HashMap<String, String>,
    fallback_usd_rates: HashMap<String, f64>,
    common_currencies: Vec<String>,
    partitions: Vec<PartitionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct SuffixRule {
    suffix: String,
    #[serde(default)]
    aliases: Vec<String>,
    currency: String,
    #[serde(default)]
    minor_unit: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct MinorUnitExchange {
    marker: String,
    currency: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PartitionEntry {
    country: String,
    label: String,
    limit: u32,
}

// ── Indexes ──────────────────────────────────────────────────────────────────

struct MarketIndex {
    catalog: MarketCatalog,
    /// Upper-cased suffix or alias (without dot) → rule
    rule_by_suffix: HashMap<String, SuffixRule>,
}

lazy_static! {
    static ref MARKETS: MarketIndex = MarketIndex::load();
}

impl MarketIndex {
    fn load() -> Self {
        let json = include_str!("markets.json");
        let catalog: MarketCatalog =
            serde_json::from_str(json).expect("markets.json must be valid");

        let mut rule_by_suffix = HashMap::new();
        for rule in &catalog.suffixes {
            rule_by_suffix.insert(rule.suffix.to_uppercase(), rule.clone());
            for alias in &rule.aliases {
                rule_by_suffix.insert(alias.to_uppercase(), rule.clone());
            }
        }

        Self {
            catalog,
            rule_by_suffix,
        }
    }
}

fn suffix_rule(suffix: &str) -> Option<&'static SuffixRule> {
    MARKETS.rule_by_suffix.get(&suffix.to_uppercase())
}

fn country_currency(country: &str) -> Option<&'static str> {
    MARKETS
        .catalog
        .country_currencies
        .get(&country.trim().to_uppercase())
        .map(String::as_str)
}

fn minor_unit_exchange(exchange: &str, currency: &str) -> bool {
    let exchange = exchange.to_uppercase();
    MARKETS
        .catalog
        .minor_unit_exchanges
        .iter()
        .any(|entry| entry.currency == currency && exchange.contains(&entry.marker))
}

/// Static approximate USD value of one unit of `currency`.
///
/// `None` for currencies the catalog does not know. USD is always `Some(1.0)`.
pub fn fallback_usd_rate(currency: &str) -> Option<f64> {
    let currency = currency.trim().to_uppercase();
    if currency == "USD" {
        return Some(1.0);
    }
    MARKETS.catalog.fallback_usd_rates.get(&currency).copied()
}

/// Currencies worth warming before normalization starts.
pub fn common_currencies() -> Vec<String> {
    MARKETS.catalog.common_currencies.clone()
}

/// The default national-market partitions, in catalog order.
pub fn default_partitions() -> Vec<PartitionQuery> {
    let floor = MARKETS.catalog.default_market_cap_floor;
    MARKETS
        .catalog
        .partitions
        .iter()
        .map(|entry| {
            PartitionQuery::new(entry.country.clone(), entry.label.clone(), entry.limit)
                .with_floor(floor)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert_eq!(
            MARKETS.catalog.default_market_cap_floor,
            DEFAULT_MARKET_CAP_FLOOR
        );
        assert!(!MARKETS.rule_by_suffix.is_empty());
    }

    #[test]
    fn test_default_partitions() {
        let partitions = default_partitions();
        assert_eq!(partitions.len(), 38);
        assert_eq!(partitions[0].country, "US");
        assert_eq!(partitions[0].limit, 5000);
        assert!(partitions.iter().all(|p| p.market_cap_floor == 50_000_000.0));

        let mut countries: Vec<_> = partitions.iter().map(|p| p.country.clone()).collect();
        countries.sort();
        countries.dedup();
        assert_eq!(countries.len(), partitions.len());
    }

    #[test]
    fn test_every_partition_country_has_a_currency() {
        for partition in default_partitions() {
            assert!(
                country_currency(&partition.country).is_some(),
                "missing currency for {}",
                partition.country
            );
        }
    }

    #[test]
    fn test_fallback_rates() {
        assert_eq!(fallback_usd_rate("USD"), Some(1.0));
        assert_eq!(fallback_usd_rate("EUR"), Some(1.08));
        assert_eq!(fallback_usd_rate("gbp"), Some(1.27));
        assert_eq!(fallback_usd_rate("IDR"), Some(0.0000625));
        assert_eq!(fallback_usd_rate("XYZ"), None);
    }

    #[test]
    fn test_common_currencies_have_fallbacks() {
        let currencies = common_currencies();
        assert_eq!(currencies.len(), 32);
        for currency in currencies {
            assert!(
                fallback_usd_rate(&currency).is_some(),
                "missing fallback for {}",
                currency
            );
        }
    }

    #[test]
    fn test_minor_unit_exchange_requires_matching_currency() {
        assert!(minor_unit_exchange("LSE", "GBP"));
        assert!(minor_unit_exchange("jnb", "ZAR"));
        assert!(!minor_unit_exchange("LSE", "USD"));
        assert!(!minor_unit_exchange("NASDAQ", "GBP"));
    }
}
