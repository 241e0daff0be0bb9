use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assets::RankedAsset;

/// The complete output of one run: every surviving asset in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSnapshot {
    pub snapshot_date: NaiveDate,
    /// Upstream identifier, e.g. "FMP"
    pub data_source: String,
    pub assets: Vec<RankedAsset>,
}

impl RankingSnapshot {
    pub fn new(snapshot_date: NaiveDate, data_source: impl Into<String>, assets: Vec<RankedAsset>) -> Self {
        Self {
            snapshot_date,
            data_source: data_source.into(),
            assets,
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn top(&self, n: usize) -> &[RankedAsset] {
        &self.assets[..n.min(self.assets.len())]
    }
}
