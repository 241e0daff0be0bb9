use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use capranker_market_data::RawRecord;
use log::debug;
use serde::{Deserialize, Serialize};

use super::listing_tier::{listing_tier, ListingTier};
use crate::assets::{canonical_name, NormalizedAsset};
use crate::errors::Error;
use crate::screening::Lexicons;

/// What makes two listings "the same company".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupKey {
    /// Canonical company name only
    #[default]
    Name,
    /// Canonical name plus country and sector. Fewer false collisions between
    /// unrelated companies that share a name, but cross-country listings of one
    /// company stop collapsing when the upstream disagrees on country.
    NameCountrySector,
}

impl FromStr for DedupKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "name" => Ok(DedupKey::Name),
            "name-country-sector" => Ok(DedupKey::NameCountrySector),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown dedup key '{}', expected 'name' or 'name-country-sector'",
                other
            ))),
        }
    }
}

impl DedupKey {
    /// Grouping key for `asset`.
    ///
    /// A listing without a usable name is its own company: the key falls back
    /// to the symbol, so nameless listings never collapse into one group.
    pub fn key_for(&self, asset: &NormalizedAsset) -> String {
        let name = canonical_name(&asset.name);
        if name.is_empty() {
            return format!("symbol:{}", asset.symbol.trim().to_uppercase());
        }
        match self {
            DedupKey::Name => name,
            DedupKey::NameCountrySector => format!(
                "{}|{}|{}",
                name,
                asset.country.trim().to_uppercase(),
                canonical_name(&asset.sector)
            ),
        }
    }
}

/// Keep only the first arrival of each symbol. Returns survivors and the number dropped.
pub fn first_arrival_by_symbol(records: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
    let mut seen = HashSet::with_capacity(records.len());
    let total = records.len();
    let kept: Vec<RawRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.symbol.trim().to_uppercase()))
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

/// Survivors of a dedup pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    /// One asset per company, in order of each company's first arrival
    pub kept: Vec<NormalizedAsset>,
    /// Listings that lost to a better listing of the same company
    pub dropped: Vec<NormalizedAsset>,
}

/// Resolves multiple listings of one company to a single canonical record.
///
/// The listing with the best [`ListingTier`] wins; within a tier the higher
/// USD market cap wins. On a full tie the earlier arrival stays.
pub struct Deduplicator {
    lexicons: Arc<Lexicons>,
    key: DedupKey,
}

impl Deduplicator {
    pub fn new(lexicons: Arc<Lexicons>, key: DedupKey) -> Self {
        Self { lexicons, key }
    }

    pub fn tier_of(&self, asset: &NormalizedAsset) -> ListingTier {
        listing_tier(
            &self.lexicons.listing_tiers,
            &asset.symbol,
            &asset.exchange,
            &asset.country,
        )
    }

    fn should_replace(&self, candidate: &NormalizedAsset, existing: &NormalizedAsset) -> bool {
        let candidate_tier = self.tier_of(candidate);
        let existing_tier = self.tier_of(existing);
        candidate_tier < existing_tier
            || (candidate_tier == existing_tier
                && candidate.market_cap_usd > existing.market_cap_usd)
    }

    pub fn dedup(&self, assets: Vec<NormalizedAsset>) -> DedupOutcome {
        let mut slot_by_key: HashMap<String, usize> = HashMap::with_capacity(assets.len());
        let mut kept: Vec<NormalizedAsset> = Vec::with_capacity(assets.len());
        let mut dropped = Vec::new();

        for asset in assets {
            let key = self.key.key_for(&asset);
            match slot_by_key.get(&key) {
                Some(&slot) => {
                    if self.should_replace(&asset, &kept[slot]) {
                        debug!(
                            "Dedup '{}': {} replaces {}",
                            key, asset.symbol, kept[slot].symbol
                        );
                        dropped.push(std::mem::replace(&mut kept[slot], asset));
                    } else {
                        debug!("Dedup '{}': keeping {} over {}", key, kept[slot].symbol, asset.symbol);
                        dropped.push(asset);
                    }
                }
                None => {
                    slot_by_key.insert(key, kept.len());
                    kept.push(asset);
                }
            }
        }

        DedupOutcome { kept, dropped }
    }
}
