//! Subscription identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row identifier of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(i64);

impl SubscriptionId {
    /// Wrap a raw storage identifier
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying integer
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SubscriptionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
