//! Notification dispatch sweep task
//!
//! Periodically walks every subscription and mails a weather update to
//! each one whose cadence has elapsed.

use std::sync::Arc;
use std::time::Duration;

use application::services::NotificationService;
use tracing::{debug, error, info};

/// Spawn a background task that periodically dispatches due weather
/// notifications.
///
/// Returns a `JoinHandle` that can be used to abort the task when
/// shutting down.
pub fn spawn_notification_sweep_task(
    notification_service: Arc<NotificationService>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    info!(
        interval_secs = interval.as_secs(),
        "Starting notification sweep task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Don't run immediately on startup
        ticker.tick().await;

        loop {
            ticker.tick().await;

            debug!("Running notification sweep");

            match notification_service.process_due().await {
                Ok(outcome) => {
                    if outcome.sent > 0 || outcome.failed > 0 {
                        info!(
                            sent = outcome.sent,
                            failed = outcome.failed,
                            "Notification sweep finished"
                        );
                    } else {
                        debug!("No notifications due");
                    }
                },
                Err(e) => {
                    error!(error = %e, "Notification sweep failed");
                },
            }
        }
    })
}
