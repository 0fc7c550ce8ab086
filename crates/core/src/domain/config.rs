// Run Configuration
// Owned and persisted by the host; immutable input per invocation.

use serde::{Deserialize, Serialize};

pub const MIN_LOOKBACK_DAYS: u32 = 1;
pub const MAX_LOOKBACK_DAYS: u32 = 30;
pub const MIN_ORDERS_PER_RUN: u32 = 5;
pub const MAX_ORDERS_PER_RUN: u32 = 100;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parameters governing one sweep. Bounds are enforced at construction, so a
/// held `RunConfig` is always within range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    lookback_days: u32,
    max_orders: u32,
    activity_log_enabled: bool,
}

impl RunConfig {
    /// Create a config, clamping lookback to [1, 30] days and the order cap
    /// to [5, 100].
    pub fn new(lookback_days: u32, max_orders: u32, activity_log_enabled: bool) -> Self {
        Self {
            lookback_days: lookback_days.clamp(MIN_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS),
            max_orders: max_orders.clamp(MIN_ORDERS_PER_RUN, MAX_ORDERS_PER_RUN),
            activity_log_enabled,
        }
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    pub fn max_orders(&self) -> u32 {
        self.max_orders
    }

    pub fn activity_log_enabled(&self) -> bool {
        self.activity_log_enabled
    }

    /// Oldest creation timestamp (epoch ms) still inside the lookback window
    pub fn lookback_cutoff(&self, now_millis: i64) -> i64 {
        now_millis - i64::from(self.lookback_days) * MILLIS_PER_DAY
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            lookback_days: 7,
            max_orders: 50,
            activity_log_enabled: true,
        }
    }
}
