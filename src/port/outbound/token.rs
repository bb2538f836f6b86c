//! Credential supply for marketplace and messaging APIs.

use async_trait::async_trait;

use crate::error::FetchError;

/// Supplies a bearer token or session secret on demand.
///
/// Acquisition and refresh are the provider's concern; callers ask for a
/// token before every request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, FetchError>;
}
