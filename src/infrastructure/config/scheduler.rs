//! Polling cadence and concurrency limits.

use std::time::Duration;

use serde::Deserialize;

use crate::application::scheduler::SchedulerSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between cycle starts (default: 300).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    #[serde(default = "default_listing_concurrency")]
    pub listing_concurrency: usize,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Attempts per source per cycle, including the first.
    #[serde(default = "default_fetch_max_attempts")]
    pub fetch_max_attempts: u32,
    #[serde(default = "default_fetch_retry_backoff_ms")]
    pub fetch_retry_backoff_ms: u64,
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

const fn default_interval_secs() -> u64 {
    300
}

const fn default_fetch_concurrency() -> usize {
    4
}

const fn default_listing_concurrency() -> usize {
    8
}

const fn default_fetch_timeout_secs() -> u64 {
    30
}

const fn default_fetch_max_attempts() -> u32 {
    2
}

const fn default_fetch_retry_backoff_ms() -> u64 {
    2_000
}

const fn default_shutdown_grace_secs() -> u64 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            fetch_concurrency: default_fetch_concurrency(),
            listing_concurrency: default_listing_concurrency(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fetch_max_attempts: default_fetch_max_attempts(),
            fetch_retry_backoff_ms: default_fetch_retry_backoff_ms(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl From<&SchedulerConfig> for SchedulerSettings {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            fetch_concurrency: config.fetch_concurrency,
            listing_concurrency: config.listing_concurrency,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            fetch_max_attempts: config.fetch_max_attempts,
            fetch_retry_backoff: Duration::from_millis(config.fetch_retry_backoff_ms),
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
        }
    }
}
