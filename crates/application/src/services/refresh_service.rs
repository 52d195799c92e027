//! Periodic weather refresh service
//!
//! Walks every registered city, re-runs the external lookup and
//! overwrites its snapshot in place. One city's failure is logged and
//! skipped; the sweep always finishes.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{CityRegistry, SnapshotStore, WeatherLookupPort};

/// Counters from one refresh sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Cities whose snapshot was overwritten
    pub refreshed: usize,
    /// Cities whose lookup failed and were skipped
    pub failed: usize,
}

/// Bulk weather refresh over the whole city registry
pub struct RefreshService {
    cities: Arc<dyn CityRegistry>,
    snapshots: Arc<dyn SnapshotStore>,
    weather: Arc<dyn WeatherLookupPort>,
}

impl std::fmt::Debug for RefreshService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshService").finish_non_exhaustive()
    }
}

impl RefreshService {
    /// Create the service over its ports
    pub fn new(
        cities: Arc<dyn CityRegistry>,
        snapshots: Arc<dyn SnapshotStore>,
        weather: Arc<dyn WeatherLookupPort>,
    ) -> Self {
        Self {
            cities,
            snapshots,
            weather,
        }
    }

    /// Refresh every city's snapshot; partial failure tolerant, no retry
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> Result<RefreshOutcome, ApplicationError> {
        let cities = self.cities.list_all().await?;
        debug!(city_count = cities.len(), "Starting weather refresh sweep");

        let mut outcome = RefreshOutcome::default();
        for city in cities {
            match self.weather.current(&city.key).await {
                Ok(reading) => {
                    self.snapshots.upsert(city.id, &reading).await?;
                    outcome.refreshed += 1;
                },
                Err(e) => {
                    warn!(city = %city.key, error = %e, "Weather refresh failed, skipping city");
                    outcome.failed += 1;
                },
            }
        }

        info!(
            refreshed = outcome.refreshed,
            failed = outcome.failed,
            "Weather refresh sweep finished"
        );
        Ok(outcome)
    }
}
