//! Token providers backed by static values or environment variables.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::port::outbound::token::TokenProvider;

/// Always returns the same token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, FetchError> {
        Ok(self.token.clone())
    }
}

/// Reads the token from an environment variable on every request, so a
/// rotated secret is picked up without a restart.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    #[must_use]
    pub fn var(&self) -> &str {
        &self.var
    }

    /// Whether the variable is currently set to a non-blank value.
    #[must_use]
    pub fn is_set(&self) -> bool {
        std::env::var(&self.var).is_ok_and(|v| !v.trim().is_empty())
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn access_token(&self) -> Result<String, FetchError> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(FetchError::Auth(format!(
                "environment variable {} is not set",
                self.var
            ))),
        }
    }
}
