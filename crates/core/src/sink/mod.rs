//! Storage boundary for finished rankings.
//!
//! A sink receives the complete snapshot and replaces whatever it held for
//! that snapshot date. File sinks write to a temporary file and rename it
//! into place, so readers never observe a half-written ranking.

mod csv_sink;
mod json_sink;
mod text;

pub use csv_sink::CsvFileSink;
pub use json_sink::JsonFileSink;
pub use text::clean_text;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use tokio::task;

use crate::errors::{Error, Result};
use crate::ranking::RankingSnapshot;

/// Destination for a completed ranking.
#[async_trait]
pub trait RankingSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Replace the stored ranking for `snapshot.snapshot_date`.
    async fn write(&self, snapshot: &RankingSnapshot) -> Result<()>;
}

/// File name shared by the file sinks: `global_stocks_<date>.<extension>`.
pub fn snapshot_file_name(date: NaiveDate, extension: &str) -> String {
    format!("global_stocks_{}.{}", date.format("%Y-%m-%d"), extension)
}

/// Write `bytes` to `path` through a sibling temp file and an atomic rename.
///
/// Runs on the blocking pool. The temp file is removed when the write or the
/// rename fails.
pub(crate) async fn replace_file(path: PathBuf, bytes: Vec<u8>) -> Result<PathBuf> {
    task::spawn_blocking(move || write_then_rename(&path, &bytes).map(|()| path))
        .await
        .map_err(|e| Error::Sink {
            sink: "file".to_string(),
            message: e.to_string(),
        })?
}

fn write_then_rename(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
        }
        return Err(e.into());
    }
    Ok(())
}

/// Sink that keeps every written snapshot in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    snapshots: Arc<Mutex<Vec<RankingSnapshot>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<RankingSnapshot> {
        self.snapshots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn latest(&self) -> Option<RankingSnapshot> {
        self.snapshots().pop()
    }
}

#[async_trait]
impl RankingSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn write(&self, snapshot: &RankingSnapshot) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        snapshots.retain(|s| s.snapshot_date != snapshot.snapshot_date);
        snapshots.push(snapshot.clone());
        Ok(())
    }
}
