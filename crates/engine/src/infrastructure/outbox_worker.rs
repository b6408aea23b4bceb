//! Background worker that drains the award outbox.

use std::future::Future;
use std::time::Duration;

use crate::infrastructure::config::EngineConfig;
use crate::use_cases::DrainOutbox;

/// Poll the outbox until `shutdown` resolves.
///
/// A full batch is followed straight away by the next one, but shutdown is
/// checked before every batch so a large backlog never delays it.
pub async fn outbox_worker(
    drain: &DrainOutbox,
    config: &EngineConfig,
    shutdown: impl Future<Output = ()>,
) {
    tracing::info!(
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        batch_size = config.batch_size,
        max_attempts = config.max_attempts,
        "Outbox worker running"
    );
    tokio::pin!(shutdown);

    let mut delay = config.poll_interval;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        delay = match drain.execute(config.batch_size).await {
            Ok(report) if report.fetched as u64 >= u64::from(config.batch_size) => Duration::ZERO,
            Ok(_) => config.poll_interval,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to drain outbox");
                config.poll_interval
            }
        };
    }
}
