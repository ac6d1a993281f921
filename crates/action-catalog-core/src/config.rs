//! Scan configuration, read once at startup and passed to the builder.

use crate::rate_limit::RateLimitPolicy;

/// Settings for a catalog run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Self-hosted endpoint: no search fallback, no quota checks.
    pub enterprise: bool,
    /// Strip `token=` query parameters from download URLs.
    pub remove_token: bool,
    /// Attach the README download URL to each entry.
    pub fetch_readmes: bool,
    /// Repositories processed at once. Search calls are always serialized.
    pub concurrency: usize,
    pub rate_limit: RateLimitPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            enterprise: false,
            remove_token: false,
            fetch_readmes: false,
            concurrency: 1,
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enterprise(mut self, enterprise: bool) -> Self {
        self.enterprise = enterprise;
        self
    }

    pub fn with_remove_token(mut self, enabled: bool) -> Self {
        self.remove_token = enabled;
        self
    }

    pub fn with_fetch_readmes(mut self, enabled: bool) -> Self {
        self.fetch_readmes = enabled;
        self
    }

    /// Values below 1 are clamped to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }
}
