//! Background sweep configuration.

use domain::FrequencyUnit;
use serde::{Deserialize, Serialize};

/// Background sweep configuration
///
/// Controls the weather refresh and notification dispatch intervals,
/// plus the unit applied to subscription frequencies. Switching the
/// unit to minutes is intended for test deployments only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Unit applied to every subscription's notification frequency
    #[serde(default)]
    pub frequency_unit: FrequencyUnit,

    /// Seconds between weather refresh sweeps (default: 3600)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Seconds between notification dispatch sweeps (default: 600)
    #[serde(default = "default_notify_interval")]
    pub notify_interval_secs: u64,
}

const fn default_refresh_interval() -> u64 {
    3600
}

const fn default_notify_interval() -> u64 {
    600
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            frequency_unit: FrequencyUnit::default(),
            refresh_interval_secs: default_refresh_interval(),
            notify_interval_secs: default_notify_interval(),
        }
    }
}
