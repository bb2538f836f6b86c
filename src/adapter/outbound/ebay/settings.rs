//! eBay Browse API configuration.

use serde::Deserialize;

use crate::application::normalize::FeeSchedule;
use crate::infrastructure::config::FeeConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct EbayConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Value of the `X-EBAY-C-MARKETPLACE-ID` header.
    #[serde(default = "default_marketplace")]
    pub marketplace: String,
    /// Category filter used when the search query carries none.
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Environment variable holding the OAuth application token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
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

fn default_api_url() -> String {
    "https://api.ebay.com".into()
}

fn default_marketplace() -> String {
    "EBAY_GB".into()
}

const fn default_page_size() -> u32 {
    50
}

const fn default_max_pages() -> u32 {
    1
}

fn default_token_env() -> String {
    "EBAY_OAUTH_TOKEN".into()
}

const fn default_timeout_ms() -> u64 {
    20_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for EbayConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_url: default_api_url(),
            marketplace: default_marketplace(),
            category_ids: Vec::new(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            token_env: default_token_env(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            fees: FeeConfig::default(),
        }
    }
}

impl EbayConfig {
    /// Buyer-protection schedule; eBay prices already include protection.
    #[must_use]
    pub fn fee_schedule(&self) -> FeeSchedule {
        self.fees.to_schedule(FeeSchedule::none())
    }
}
