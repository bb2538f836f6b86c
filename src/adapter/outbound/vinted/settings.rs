//! Vinted catalog API configuration.

use serde::Deserialize;

use crate::application::normalize::FeeSchedule;
use crate::domain::id::Source;
use crate::infrastructure::config::FeeConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct VintedConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Catalog filter used when the search query carries none.
    #[serde(default)]
    pub catalog_ids: Vec<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Environment variable holding an optional session cookie.
    #[serde(default = "default_cookie_env")]
    pub cookie_env: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default)]
    pub fees: FeeConfig,
}

const fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://www.vinted.co.uk".into()
}

const fn default_page_size() -> u32 {
    20
}

const fn default_max_pages() -> u32 {
    1
}

fn default_cookie_env() -> String {
    "VINTED_COOKIE".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .into()
}

const fn default_timeout_ms() -> u64 {
    20_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for VintedConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            catalog_ids: Vec::new(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            cookie_env: default_cookie_env(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            fees: FeeConfig::default(),
        }
    }
}

impl VintedConfig {
    /// Buyer-protection schedule, 5% + 0.70 unless overridden.
    #[must_use]
    pub fn fee_schedule(&self) -> FeeSchedule {
        self.fees.to_schedule(FeeSchedule::default_for(Source::Vinted))
    }
}
