//! Shared reqwest plumbing for outbound adapters.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::FetchError;

/// Longest response body excerpt kept in error messages.
const BODY_EXCERPT: usize = 512;

/// Build an HTTP client with the given timeouts, falling back to defaults.
#[must_use]
pub fn build_client(timeout_ms: u64, connect_timeout_ms: u64, user_agent: Option<&str>) -> Client {
    let mut builder = Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .connect_timeout(Duration::from_millis(connect_timeout_ms));
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }
    builder.build().unwrap_or_else(|err| {
        warn!(error = %err, "Failed to build HTTP client, using defaults");
        Client::new()
    })
}

/// Truncate a response body for logging.
#[must_use]
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Decode a JSON response, classifying non-success statuses.
pub async fn read_json<T>(response: Response) -> Result<T, FetchError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::from_status(status.as_u16(), excerpt(&body)));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| FetchError::Decode(err.to_string()))
}
