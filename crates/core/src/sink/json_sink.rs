use std::path::PathBuf;

use async_trait::async_trait;
use log::info;
use serde::Serialize;

use super::{replace_file, snapshot_file_name, RankingSink};
use crate::assets::RankedAsset;
use crate::errors::Result;
use crate::ranking::RankingSnapshot;

/// One row of the JSON output.
#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    rank: usize,
    ticker: &'a str,
    name: &'a str,
    market_cap: f64,
    current_price: Option<f64>,
    previous_close: Option<f64>,
    percentage_change: Option<f64>,
    volume: Option<f64>,
    primary_exchange: &'a str,
    country: &'a str,
    sector: &'a str,
    industry: &'a str,
    asset_type: &'static str,
    image: Option<&'a str>,
    snapshot_date: String,
    data_source: &'a str,
}

impl<'a> JsonRow<'a> {
    fn new(ranked: &'a RankedAsset, snapshot: &'a RankingSnapshot) -> Self {
        let asset = &ranked.asset;
        Self {
            rank: ranked.rank,
            ticker: &asset.symbol,
            name: &asset.name,
            market_cap: asset.market_cap_usd,
            current_price: asset.price,
            previous_close: asset.previous_close,
            percentage_change: asset.percent_change,
            volume: asset.volume,
            primary_exchange: &asset.exchange,
            country: &asset.country,
            sector: &asset.sector,
            industry: &asset.industry,
            asset_type: asset.asset_type.as_str(),
            image: asset.image.as_deref(),
            snapshot_date: snapshot.snapshot_date.to_string(),
            data_source: &snapshot.data_source,
        }
    }
}

/// Writes `global_stocks_<date>.json` as a pretty-printed array.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, snapshot: &RankingSnapshot) -> PathBuf {
        self.dir
            .join(snapshot_file_name(snapshot.snapshot_date, "json"))
    }

    pub fn render(snapshot: &RankingSnapshot) -> Result<String> {
        let rows: Vec<JsonRow<'_>> = snapshot
            .assets
            .iter()
            .map(|ranked| JsonRow::new(ranked, snapshot))
            .collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }
}

#[async_trait]
impl RankingSink for JsonFileSink {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn write(&self, snapshot: &RankingSnapshot) -> Result<()> {
        let body = Self::render(snapshot)?;
        let path = replace_file(self.path_for(snapshot), body.into_bytes()).await?;
        info!("Wrote {} ranked assets to {}", snapshot.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_support::snapshot;

    #[tokio::test]
    async fn test_writes_ranked_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path());
        let snapshot = snapshot();

        sink.write(&snapshot).await.unwrap();

        let path = dir.path().join("global_stocks_2024-06-28.json");
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[0]["ticker"], "AAPL");
        assert_eq!(rows[0]["market_cap"], 3.4e12);
        assert_eq!(rows[0]["primary_exchange"], "NASDAQ");
        assert_eq!(rows[0]["snapshot_date"], "2024-06-28");
        assert_eq!(rows[0]["data_source"], "FMP");
        assert_eq!(rows[1]["asset_type"], "reit");
        assert!(rows[1]["previous_close"].is_null());
        assert!(rows[1]["image"].is_null());
    }

    #[tokio::test]
    async fn test_rewrite_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path());
        let mut snapshot = snapshot();

        sink.write(&snapshot).await.unwrap();
        snapshot.assets.truncate(1);
        sink.write(&snapshot).await.unwrap();

        let body = std::fs::read_to_string(sink.path_for(&snapshot)).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
