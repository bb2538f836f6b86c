//! Text messages through the WhatsApp Cloud API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Serialize;

use super::settings::WhatsAppConfig;
use crate::adapter::outbound::http::{build_client, excerpt};
use crate::domain::notification::Msisdn;
use crate::error::SendError;
use crate::port::outbound::messaging::MessageSender;
use crate::port::outbound::token::TokenProvider;

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    preview_url: bool,
    body: &'a str,
}

impl<'a> TextMessage<'a> {
    fn new(recipient: &'a Msisdn, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to: recipient.digits(),
            kind: "text",
            text: TextBody {
                preview_url: false,
                body,
            },
        }
    }
}

/// Classify a failed HTTP status for retry purposes.
fn status_error(status: StatusCode, body: &str) -> SendError {
    let message = format!("{status}: {}", excerpt(body));
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        SendError::Transient(message)
    } else {
        SendError::Permanent(message)
    }
}

fn transport_error(err: &reqwest::Error) -> SendError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        SendError::Transient(err.to_string())
    } else {
        SendError::Permanent(err.to_string())
    }
}

pub struct WhatsAppSender {
    http: HttpClient,
    endpoint: String,
    tokens: Arc<dyn TokenProvider>,
}

impl WhatsAppSender {
    #[must_use]
    pub fn new(config: &WhatsAppConfig, phone_number_id: &str, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: build_client(config.timeout_ms, config.connect_timeout_ms, None),
            endpoint: format!(
                "{}/{}/messages",
                config.api_url.trim_end_matches('/'),
                phone_number_id
            ),
            tokens,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MessageSender for WhatsAppSender {
    async fn send_text(&self, recipient: &Msisdn, body: &str) -> Result<(), SendError> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| SendError::Permanent(e.to_string()))?;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&TextMessage::new(recipient, body))
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    fn provider_name(&self) -> &'static str {
        "whatsapp"
    }
}
