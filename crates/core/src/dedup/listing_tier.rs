use serde::Serialize;

use crate::screening::ListingTierTable;

/// Listing priority. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingTier {
    /// The company's own home market, or Hong Kong
    Primary = 1,
    /// Major global primary exchanges
    MajorGlobal = 2,
    Regional = 3,
    /// Everything else, OTC included
    Other = 4,
}

/// Assign a listing tier from the symbol suffix, exchange code and company country.
pub fn listing_tier(
    table: &ListingTierTable,
    symbol: &str,
    exchange: &str,
    country: &str,
) -> ListingTier {
    let symbol = symbol.trim().to_uppercase();
    let exchange = exchange.trim().to_uppercase();
    let country = country.trim().to_uppercase();

    let suffix = symbol.rsplit_once('.').map(|(_, suffix)| suffix);
    let primary_suffix = suffix.is_some_and(|s| table.primary_suffixes.iter().any(|p| p == s));
    if primary_suffix || table.primary_exchanges.contains(&exchange) {
        return ListingTier::Primary;
    }

    if !exchange.is_empty()
        && table
            .home_exchanges
            .get(&country)
            .is_some_and(|home| home.contains(&exchange))
    {
        return ListingTier::Primary;
    }

    if table.major_exchanges.contains(&exchange)
        || table
            .major_exchange_markers
            .iter()
            .any(|marker| exchange.contains(marker.as_str()))
    {
        return ListingTier::MajorGlobal;
    }

    if table.regional_exchanges.contains(&exchange) {
        return ListingTier::Regional;
    }

    ListingTier::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::Lexicons;

    fn tier(symbol: &str, exchange: &str, country: &str) -> ListingTier {
        listing_tier(&Lexicons::embedded().listing_tiers, symbol, exchange, country)
    }

    #[test]
    fn test_hong_kong_is_always_primary() {
        assert_eq!(tier("0700.HK", "HKSE", "CN"), ListingTier::Primary);
        assert_eq!(tier("0700.hk", "", "CN"), ListingTier::Primary);
        assert_eq!(tier("9988", "HKSE", "CN"), ListingTier::Primary);
    }

    #[test]
    fn test_home_exchange_is_primary() {
        assert_eq!(tier("7203.T", "JPX", "JP"), ListingTier::Primary);
        assert_eq!(tier("AAPL", "NASDAQ", "US"), ListingTier::Primary);
        assert_eq!(tier("BHP.AX", "ASX", "AU"), ListingTier::Primary);
    }

    #[test]
    fn test_foreign_listing_on_major_exchange() {
        // ADR of a Japanese company on NYSE
        assert_eq!(tier("TM", "NYSE", "JP"), ListingTier::MajorGlobal);
        assert_eq!(tier("SHEL", "LSE", "NL"), ListingTier::MajorGlobal);
        assert_eq!(tier("2222.SR", "SAUDI EXCHANGE", "US"), ListingTier::MajorGlobal);
    }

    #[test]
    fn test_regional_and_other() {
        assert_eq!(tier("RIO.AX", "ASX", "GB"), ListingTier::Regional);
        assert_eq!(tier("TCEHY", "OTC", "CN"), ListingTier::Other);
        assert_eq!(tier("XYZ", "", "US"), ListingTier::Other);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(ListingTier::Primary < ListingTier::MajorGlobal);
        assert!(ListingTier::Regional < ListingTier::Other);
    }
}
