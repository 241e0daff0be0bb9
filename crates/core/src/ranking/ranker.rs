use crate::assets::{NormalizedAsset, RankedAsset};

/// Sort by USD market cap, descending, and assign ranks `1..=n`.
///
/// The sort is stable, so equal caps keep their incoming order.
pub fn rank(mut assets: Vec<NormalizedAsset>) -> Vec<RankedAsset> {
    assets.sort_by(|a, b| b.market_cap_usd.total_cmp(&a.market_cap_usd));
    assets
        .into_iter()
        .enumerate()
        .map(|(index, asset)| RankedAsset {
            rank: index + 1,
            asset,
        })
        .collect()
}
