//! Alert threshold, recipient and delivery policy.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::notify::RetryPolicy;
use crate::domain::dedup::LeasePolicy;
use crate::domain::notification::Msisdn;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    /// Minimum profit, in the base currency, that triggers an alert.
    #[serde(default = "default_profit_threshold")]
    pub profit_threshold: Decimal,
    /// Recipient MSISDN; falls back to `recipient_env`.
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default = "default_recipient_env")]
    pub recipient_env: String,
    /// Send attempts per claim, and claims per listing.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,
    /// Seconds a pending reservation is protected from other claimants.
    #[serde(default = "default_pending_lease_secs")]
    pub pending_lease_secs: u64,
}

fn default_profit_threshold() -> Decimal {
    Decimal::from(12)
}

fn default_recipient_env() -> String {
    "WHATSAPP_TO_MSISDN".into()
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1_000
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

const fn default_max_jitter_ms() -> u64 {
    250
}

const fn default_rate_limit_per_minute() -> u32 {
    20
}

const fn default_pending_lease_secs() -> u64 {
    600
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            profit_threshold: default_profit_threshold(),
            recipient: None,
            recipient_env: default_recipient_env(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_jitter_ms: default_max_jitter_ms(),
            rate_limit_per_minute: default_rate_limit_per_minute(),
            pending_lease_secs: default_pending_lease_secs(),
        }
    }
}

impl AlertsConfig {
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            multiplier: self.backoff_multiplier,
            max_jitter: Duration::from_millis(self.max_jitter_ms),
        }
    }

    #[must_use]
    pub fn lease_policy(&self) -> LeasePolicy {
        LeasePolicy::new(Duration::from_secs(self.pending_lease_secs), self.max_attempts)
    }

    /// Recipient from the config file, or from `recipient_env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] when neither is set, or
    /// [`ConfigError::InvalidValue`] when the number is malformed.
    pub fn resolve_recipient(&self) -> Result<Msisdn> {
        let raw = match &self.recipient {
            Some(value) => value.clone(),
            None => std::env::var(&self.recipient_env).map_err(|_| ConfigError::MissingEnv {
                name: self.recipient_env.clone(),
            })?,
        };
        Msisdn::parse(&raw).map_err(|e| {
            ConfigError::InvalidValue {
                field: "recipient",
                reason: e.to_string(),
            }
            .into()
        })
    }
}
