//! WhatsApp Cloud API configuration.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Graph API base including the version segment.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Sending phone number id; falls back to `phone_number_id_env`.
    #[serde(default)]
    pub phone_number_id: Option<String>,
    #[serde(default = "default_phone_number_id_env")]
    pub phone_number_id_env: String,
    /// Environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_api_url() -> String {
    "https://graph.facebook.com/v17.0".into()
}

fn default_phone_number_id_env() -> String {
    "WHATSAPP_PHONE_NUMBER_ID".into()
}

fn default_token_env() -> String {
    "WHATSAPP_ACCESS_TOKEN".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            phone_number_id: None,
            phone_number_id_env: default_phone_number_id_env(),
            token_env: default_token_env(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl WhatsAppConfig {
    /// Configured phone number id, or the value of `phone_number_id_env`.
    #[must_use]
    pub fn resolve_phone_number_id(&self) -> Option<String> {
        self.phone_number_id
            .clone()
            .or_else(|| std::env::var(&self.phone_number_id_env).ok())
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    }
}
