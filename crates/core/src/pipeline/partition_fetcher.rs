use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use capranker_market_data::{
    FailureKind, MarketDataSource, Pacer, PartitionQuery, RawRecord, UpstreamError,
};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;

/// A partition that produced no records because its fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedPartition {
    pub query: PartitionQuery,
    pub kind: FailureKind,
    pub message: String,
}

/// Everything the fetch stage produced.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub attempted: usize,
    /// Records from every successful partition, in arrival order
    pub records: Vec<RawRecord>,
    /// Successful partitions with their record counts, in completion order
    pub succeeded: Vec<(PartitionQuery, usize)>,
    pub failed: Vec<FailedPartition>,
}

impl FetchReport {
    /// True when no partition succeeded, the only fatal fetch outcome.
    pub fn is_total_failure(&self) -> bool {
        self.succeeded.is_empty()
    }
}

struct PartitionOutcome {
    query: PartitionQuery,
    result: Result<Vec<RawRecord>, UpstreamError>,
}

/// Fixed-size worker pool that attempts every partition exactly once.
///
/// Workers pull from a shared queue and send each outcome over a channel;
/// the queue lock is only held to pop the next query. A failed or timed-out
/// partition is reported and contributes zero records.
pub struct PartitionFetcher {
    source: Arc<dyn MarketDataSource>,
    workers: usize,
    spacing: Duration,
    unit_timeout: Duration,
}

impl PartitionFetcher {
    /// `spacing` is raised to the source's own minimum delay when that is larger.
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        workers: usize,
        spacing: Duration,
        unit_timeout: Duration,
    ) -> Self {
        let spacing = spacing.max(source.rate_limit().min_delay);
        Self {
            source,
            workers: workers.max(1),
            spacing,
            unit_timeout,
        }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    pub async fn fetch_all(&self, partitions: Vec<PartitionQuery>) -> FetchReport {
        let attempted = partitions.len();
        let mut report = FetchReport {
            attempted,
            ..Default::default()
        };
        if attempted == 0 {
            return report;
        }

        let queue = Arc::new(Mutex::new(VecDeque::from(partitions)));
        let (tx, mut rx) = mpsc::channel::<PartitionOutcome>(attempted);
        let workers = self.workers.min(attempted);
        info!(
            "Fetching {} partitions with {} workers ({:?} spacing)",
            attempted, workers, self.spacing
        );

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let source = Arc::clone(&self.source);
            let spacing = self.spacing;
            let unit_timeout = self.unit_timeout;

            handles.push(tokio::spawn(async move {
                let mut pacer = Pacer::new(spacing);
                loop {
                    let next = queue
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .pop_front();
                    let Some(query) = next else {
                        break;
                    };

                    pacer.wait().await;
                    info!("Fetching {}", query);
                    let result =
                        match tokio::time::timeout(unit_timeout, source.fetch_partition(&query))
                            .await
                        {
                            Ok(result) => result,
                            Err(_) => Err(UpstreamError::Timeout {
                                endpoint: format!("partition {}", query.country),
                            }),
                        };

                    // Receiver only goes away if the caller was cancelled.
                    if tx.send(PartitionOutcome { query, result }).await.is_err() {
                        break;
                    }
                }
                debug!("Partition worker {} finished", worker_id);
            }));
        }
        drop(tx);

        while let Some(outcome) = rx.recv().await {
            match outcome.result {
                Ok(records) => {
                    info!("{}: {} records", outcome.query, records.len());
                    report.succeeded.push((outcome.query, records.len()));
                    report.records.extend(records);
                }
                Err(e) => {
                    warn!("{} failed, market skipped: {}", outcome.query, e);
                    report.failed.push(FailedPartition {
                        query: outcome.query,
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Partition worker panicked: {}", e);
            }
        }

        info!(
            "Fetched {} records from {}/{} partitions",
            report.records.len(),
            report.succeeded.len(),
            attempted
        );
        report
    }
}
