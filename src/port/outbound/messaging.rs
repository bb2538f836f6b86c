//! Outbound text messaging.

use async_trait::async_trait;

use crate::domain::notification::Msisdn;
use crate::error::SendError;

/// Delivers a single text message. One call is one attempt; retries and
/// rate limiting belong to the caller.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, recipient: &Msisdn, body: &str) -> Result<(), SendError>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}
