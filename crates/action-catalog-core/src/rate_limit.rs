//! Search-quota governor.
//!
//! The code-search endpoint enforces its own per-minute quota. Before each
//! search the governor looks at the remaining quota and, when it is nearly
//! exhausted, sleeps until the window resets.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Remaining search quota as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuota {
    pub remaining: u32,
    /// Unix timestamp (seconds) at which the quota window resets.
    pub reset_epoch_seconds: i64,
}

/// Thresholds used by [`RateLimitGovernor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Wait when `remaining` is at or below this value.
    pub min_remaining: u32,
    /// Added to the time left until reset.
    pub safety_margin: Duration,
    /// Used when the reset time is already in the past.
    pub stale_reset_wait: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_remaining: 2,
            safety_margin: Duration::from_millis(1000),
            stale_reset_wait: Duration::from_millis(2500),
        }
    }
}

/// Delays search calls so the provider never has to reject them.
#[derive(Debug, Clone, Default)]
pub struct RateLimitGovernor {
    policy: RateLimitPolicy,
}

impl RateLimitGovernor {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// How long to wait before searching, given `quota` observed at `now`.
    ///
    /// `None` means proceed immediately.
    pub fn wait_for(&self, quota: &SearchQuota, now: DateTime<Utc>) -> Option<Duration> {
        if quota.remaining > self.policy.min_remaining {
            return None;
        }

        let reset_ms = quota.reset_epoch_seconds.saturating_mul(1000);
        let wait_ms = reset_ms - now.timestamp_millis();
        if wait_ms < 0 {
            Some(self.policy.stale_reset_wait)
        } else {
            Some(Duration::from_millis(wait_ms as u64) + self.policy.safety_margin)
        }
    }

    /// Sleep if `quota` is nearly exhausted. Never fails and does not
    /// re-check the quota after waking.
    pub async fn await_quota(&self, quota: &SearchQuota) {
        let Some(wait) = self.wait_for(quota, Utc::now()) else {
            debug!(remaining = quota.remaining, "search quota available");
            return;
        };

        debug!(reset = quota.reset_epoch_seconds, "search API reset time");
        info!(
            wait_secs = wait.as_secs_f64(),
            "Waiting {:.1} seconds to prevent the search API rate limit",
            wait.as_secs_f64()
        );
        tokio::time::sleep(wait).await;
    }
}
