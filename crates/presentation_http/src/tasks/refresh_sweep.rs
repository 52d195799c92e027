//! Weather refresh sweep task
//!
//! Periodically re-fetches current weather for every registered city
//! and overwrites each city's snapshot in place.

use std::sync::Arc;
use std::time::Duration;

use application::services::RefreshService;
use tracing::{debug, error, info};

/// Spawn a background task that periodically refreshes every city's
/// weather snapshot.
///
/// A city whose lookup fails is skipped for that cycle; the sweep
/// itself keeps running. Returns a `JoinHandle` that can be used to
/// abort the task when shutting down.
pub fn spawn_refresh_sweep_task(
    refresh_service: Arc<RefreshService>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    info!(
        interval_secs = interval.as_secs(),
        "Starting weather refresh sweep task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Don't run immediately on startup
        ticker.tick().await;

        loop {
            ticker.tick().await;

            debug!("Running weather refresh sweep");

            match refresh_service.refresh_all().await {
                Ok(outcome) => {
                    if outcome.failed > 0 {
                        info!(
                            refreshed = outcome.refreshed,
                            failed = outcome.failed,
                            "Weather refresh sweep finished with failures"
                        );
                    } else {
                        debug!(refreshed = outcome.refreshed, "Weather refresh sweep finished");
                    }
                },
                Err(e) => {
                    error!(error = %e, "Weather refresh sweep failed");
                },
            }
        }
    })
}
