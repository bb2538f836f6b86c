//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file; secrets such as API
//! tokens never live in the file and are read from the environment variables
//! it names.
//!
//! # Example
//!
//! ```no_run
//! use flipper::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use super::alerts::AlertsConfig;
use super::logging::LoggingConfig;
use super::risk::RiskConfig;
use super::scheduler::SchedulerConfig;
use super::search::SearchConfig;
use crate::adapter::outbound::ebay::EbayConfig;
use crate::adapter::outbound::vinted::VintedConfig;
use crate::adapter::outbound::whatsapp::WhatsAppConfig;
use crate::domain::notification::Msisdn;
use crate::error::{ConfigError, Result};

/// Per-marketplace settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub ebay: EbayConfig,
    #[serde(default)]
    pub vinted: VintedConfig,
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the SQLite dedup database, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Path to the resale rules file.
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub alerts: AlertsConfig,

    #[serde(default)]
    pub risk: RiskConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

fn default_database_path() -> String {
    "flipper.db".to_string()
}

fn default_rules_path() -> PathBuf {
    PathBuf::from("rules.toml")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            rules_path: default_rules_path(),
            logging: LoggingConfig::default(),
            search: SearchConfig::default(),
            scheduler: SchedulerConfig::default(),
            alerts: AlertsConfig::default(),
            risk: RiskConfig::default(),
            sources: SourcesConfig::default(),
            whatsapp: WhatsAppConfig::default(),
        }
    }
}

const FEE_RANGE: &str = "percent must be in [0, 1) and fixed in [0, 100000000]";

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// A relative `rules_path` is resolved against the config file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse_toml(&content)?;
        if config.rules_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.rules_path = dir.join(&config.rules_path);
            }
        }
        Ok(config)
    }

    /// Initialize the tracing subscriber from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.rules_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField { field: "rules_path" }.into());
        }
        if !self.logging.is_known_format() {
            return Err(invalid("logging.format", "must be \"pretty\" or \"json\""));
        }

        self.validate_search()?;
        self.validate_scheduler()?;
        self.validate_alerts()?;
        self.validate_risk()?;
        self.validate_sources()?;

        if self.whatsapp.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "whatsapp.api_url",
            }
            .into());
        }
        Ok(())
    }

    fn validate_search(&self) -> Result<()> {
        let search = &self.search;
        if search.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(invalid("search.keywords", "at least one keyword is required"));
        }
        if search.currency.len() != 3 || !search.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid("search.currency", "must be a three-letter ISO 4217 code"));
        }
        Ok(())
    }

    fn validate_scheduler(&self) -> Result<()> {
        let scheduler = &self.scheduler;
        if scheduler.interval_secs == 0 {
            return Err(invalid("scheduler.interval_secs", "must be greater than 0"));
        }
        if scheduler.fetch_concurrency == 0 || scheduler.listing_concurrency == 0 {
            return Err(invalid(
                "scheduler.concurrency",
                "fetch and listing concurrency must be greater than 0",
            ));
        }
        if scheduler.fetch_timeout_secs == 0 {
            return Err(invalid("scheduler.fetch_timeout_secs", "must be greater than 0"));
        }
        if scheduler.fetch_max_attempts == 0 {
            return Err(invalid("scheduler.fetch_max_attempts", "must be greater than 0"));
        }
        Ok(())
    }

    fn validate_alerts(&self) -> Result<()> {
        let alerts = &self.alerts;
        if alerts.profit_threshold < Decimal::ZERO {
            return Err(invalid("alerts.profit_threshold", "must be 0 or greater"));
        }
        if alerts.max_attempts == 0 {
            return Err(invalid("alerts.max_attempts", "must be greater than 0"));
        }
        if !(1.0..=10.0).contains(&alerts.backoff_multiplier) {
            return Err(invalid("alerts.backoff_multiplier", "must be between 1.0 and 10.0"));
        }
        if alerts.rate_limit_per_minute == 0 {
            return Err(invalid("alerts.rate_limit_per_minute", "must be greater than 0"));
        }
        if alerts.pending_lease_secs == 0 {
            return Err(invalid("alerts.pending_lease_secs", "must be greater than 0"));
        }
        if let Some(recipient) = &alerts.recipient {
            Msisdn::parse(recipient).map_err(|e| invalid("alerts.recipient", &e.to_string()))?;
        }
        Ok(())
    }

    fn validate_risk(&self) -> Result<()> {
        let risk = &self.risk;
        if risk.medium_margin < Decimal::ZERO || risk.low_margin < risk.medium_margin {
            return Err(invalid(
                "risk",
                "margins must satisfy 0 <= medium_margin <= low_margin",
            ));
        }
        if let Some(min) = risk.min_seller_feedback {
            if min < Decimal::ZERO || min > Decimal::ONE_HUNDRED {
                return Err(invalid("risk.min_seller_feedback", "must be between 0 and 100"));
            }
        }
        Ok(())
    }

    fn validate_sources(&self) -> Result<()> {
        let ebay = &self.sources.ebay;
        let vinted = &self.sources.vinted;
        if !ebay.enabled && !vinted.enabled {
            return Err(invalid("sources", "at least one source must be enabled"));
        }
        if ebay.enabled {
            if ebay.page_size == 0 || ebay.page_size > 200 || ebay.max_pages == 0 {
                return Err(invalid(
                    "sources.ebay",
                    "page_size must be 1-200 and max_pages greater than 0",
                ));
            }
            if !ebay.fees.is_valid() {
                return Err(invalid("sources.ebay.fees", FEE_RANGE));
            }
        }
        if vinted.enabled {
            if vinted.page_size == 0 || vinted.max_pages == 0 {
                return Err(invalid(
                    "sources.vinted",
                    "page_size and max_pages must be greater than 0",
                ));
            }
            if url::Url::parse(&vinted.base_url).is_err() {
                return Err(invalid("sources.vinted.base_url", "must be an absolute URL"));
            }
            if !vinted.fees.is_valid() {
                return Err(invalid("sources.vinted.fees", FEE_RANGE));
            }
        }
        Ok(())
    }
}
