//! Notification frequency unit
//!
//! The frequency stored on a subscription is a bare count; this single
//! global switch decides whether it counts hours (production) or minutes
//! (test deployments).

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Unit applied to every subscription's notification frequency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    /// Frequency counts hours
    #[default]
    Hours,
    /// Frequency counts minutes
    Minutes,
}

impl FrequencyUnit {
    /// The time span covered by `count` of this unit
    pub fn span(self, count: u32) -> Duration {
        match self {
            Self::Hours => Duration::hours(i64::from(count)),
            Self::Minutes => Duration::minutes(i64::from(count)),
        }
    }
}
