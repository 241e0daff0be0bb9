use super::DropReason;
use crate::constants::{DEFAULT_MARKET_CAP_CEILING, DEFAULT_MARKET_CAP_FLOOR};

/// Plausible USD market cap range, exclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketCapBounds {
    pub floor: f64,
    pub ceiling: f64,
}

impl MarketCapBounds {
    pub fn new(floor: f64, ceiling: f64) -> Self {
        Self { floor, ceiling }
    }

    /// Keep iff `floor < cap < ceiling`. Violations are dropped, never clamped.
    pub fn check(&self, market_cap_usd: f64) -> Result<(), DropReason> {
        if !market_cap_usd.is_finite() || market_cap_usd >= self.ceiling {
            Err(DropReason::CeilingExceeded)
        } else if market_cap_usd <= self.floor {
            Err(DropReason::BelowFloor)
        } else {
            Ok(())
        }
    }

    pub fn contains(&self, market_cap_usd: f64) -> bool {
        self.check(market_cap_usd).is_ok()
    }
}

impl Default for MarketCapBounds {
    fn default() -> Self {
        Self::new(DEFAULT_MARKET_CAP_FLOOR, DEFAULT_MARKET_CAP_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_exclusive() {
        let bounds = MarketCapBounds::default();
        assert_eq!(bounds.check(50_000_000.0), Err(DropReason::BelowFloor));
        assert_eq!(bounds.check(5e12), Err(DropReason::CeilingExceeded));
        assert_eq!(bounds.check(9e12), Err(DropReason::CeilingExceeded));
        assert!(bounds.contains(50_000_001.0));
        assert!(bounds.contains(3.4e12));
    }

    #[test]
    fn test_non_finite_is_ceiling_violation() {
        let bounds = MarketCapBounds::default();
        assert_eq!(bounds.check(f64::INFINITY), Err(DropReason::CeilingExceeded));
        assert_eq!(bounds.check(f64::NAN), Err(DropReason::CeilingExceeded));
    }
}
