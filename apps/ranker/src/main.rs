use std::process::ExitCode;

use capranker_cli::config::Config;
use capranker_cli::{exit_code_for, init_tracing, run, EXIT_CONFIG};
use capranker_core::Error as CoreError;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();
    init_tracing();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match run(&config).await {
        Ok(report) => {
            tracing::info!(
                "Ranked {} companies for {}",
                report.snapshot.len(),
                report.snapshot.snapshot_date
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let total_failure = e
                .downcast_ref::<CoreError>()
                .is_some_and(CoreError::is_total_coverage_failure);
            if total_failure {
                tracing::error!("No usable data: {}", e);
            } else {
                tracing::error!("Run failed: {:#}", e);
            }
            ExitCode::from(exit_code_for(&e))
        }
    }
}
