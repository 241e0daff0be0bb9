use std::time::Duration;

use tokio::time::Instant;

/// Minimum spacing between one worker's consecutive requests.
///
/// Each worker owns its pacer, so there is no shared state. The first call
/// never waits.
#[derive(Debug)]
pub struct Pacer {
    spacing: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last: None,
        }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Sleep until at least `spacing` has passed since the previous call.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            tokio::time::sleep_until(last + self.spacing).await;
        }
        self.last = Some(Instant::now());
    }
}
