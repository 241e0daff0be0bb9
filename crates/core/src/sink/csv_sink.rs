use std::path::PathBuf;

use async_trait::async_trait;
use log::info;

use super::{clean_text, replace_file, snapshot_file_name, RankingSink};
use crate::errors::{Error, Result};
use crate::ranking::RankingSnapshot;

/// UTF-8 byte order mark, so spreadsheet apps pick the right encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 13] = [
    "Rank",
    "Ticker",
    "Name",
    "Country",
    "Sector",
    "Industry",
    "Market_Cap_USD",
    "Current_Price",
    "Previous_Close",
    "Percentage_Change",
    "Volume",
    "Exchange",
    "Asset_Type",
];

/// Writes `global_stocks_<date>.csv` with a BOM and cleaned text fields.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    dir: PathBuf,
}

impl CsvFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, snapshot: &RankingSnapshot) -> PathBuf {
        self.dir
            .join(snapshot_file_name(snapshot.snapshot_date, "csv"))
    }

    pub fn render(snapshot: &RankingSnapshot) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(UTF8_BOM.to_vec());
        wtr.write_record(HEADER)?;

        for ranked in &snapshot.assets {
            let a = &ranked.asset;
            wtr.write_record([
                ranked.rank.to_string(),
                clean_text(&a.symbol),
                clean_text(&a.name),
                clean_text(&a.country),
                clean_text(&a.sector),
                clean_text(&a.industry),
                format!("{:.0}", a.market_cap_usd),
                optional(a.price, 2),
                optional(a.previous_close, 2),
                optional(a.percent_change, 2),
                optional(a.volume, 0),
                clean_text(&a.exchange),
                a.asset_type.to_string(),
            ])?;
        }

        wtr.into_inner().map_err(|e| Error::Sink {
            sink: "csv".to_string(),
            message: e.to_string(),
        })
    }
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_default()
}

#[async_trait]
impl RankingSink for CsvFileSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn write(&self, snapshot: &RankingSnapshot) -> Result<()> {
        let body = Self::render(snapshot)?;
        let path = replace_file(self.path_for(snapshot), body).await?;
        info!("Wrote {} ranked assets to {}", snapshot.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_support::snapshot;

    #[tokio::test]
    async fn test_writes_bom_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvFileSink::new(dir.path());
        let snapshot = snapshot();

        sink.write(&snapshot).await.unwrap();

        let bytes = std::fs::read(dir.path().join("global_stocks_2024-06-28.csv")).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(
            lines[1],
            "1,AAPL,Apple Inc.,US,Technology,Consumer Electronics,3400000000000,187.25,185.00,1.33,52000000,NASDAQ,stock"
        );
        assert_eq!(
            lines[2],
            "2,NESN.SW,Nestlé S.A.,CH,Technology,Consumer Electronics,290000000000,187.25,,,52000000,NASDAQ,reit"
        );
    }
}
