//! Alert delivery with rate limiting and bounded retries.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::rate_limit::RateLimiter;
use crate::domain::notification::NotificationRequest;
use crate::port::outbound::messaging::MessageSender;

/// Longest wait between two send attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(3600);

/// Backoff schedule for transient send failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    /// Upper bound of the random delay added to each backoff.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1000),
            multiplier: 2.0,
            max_jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, without jitter, capped at
    /// [`MAX_BACKOFF`].
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        if self.initial_backoff.is_zero() {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1).min(16) as i32;
        let factor = self.multiplier.max(1.0).powi(exponent);
        Duration::try_from_secs_f64(self.initial_backoff.as_secs_f64() * factor)
            .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }
}

/// Result of delivering one alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered { attempts: u32 },
    Failed { attempts: u32, reason: String },
}

impl Delivery {
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Delivered { attempts } | Self::Failed { attempts, .. } => *attempts,
        }
    }

    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Sends alerts through a [`MessageSender`].
///
/// Each attempt waits for the shared rate limiter. Transient failures are
/// retried with exponential backoff up to [`RetryPolicy::max_attempts`];
/// permanent failures stop immediately.
pub struct AlertNotifier {
    sender: Arc<dyn MessageSender>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl AlertNotifier {
    #[must_use]
    pub fn new(sender: Arc<dyn MessageSender>, limiter: Arc<RateLimiter>, retry: RetryPolicy) -> Self {
        Self {
            sender,
            limiter,
            retry,
        }
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub async fn send(&self, request: &NotificationRequest) -> Delivery {
        let max_attempts = self.retry.max_attempts.max(1);
        let provider = self.sender.provider_name();
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.limiter.acquire().await;

            match self.sender.send_text(&request.recipient, &request.message).await {
                Ok(()) => {
                    if attempt > 1 {
                        info!(listing = %request.listing_key, provider, attempts = attempt, "Alert delivered after retries");
                    } else {
                        debug!(listing = %request.listing_key, provider, "Alert delivered");
                    }
                    return Delivery::Delivered { attempts: attempt };
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.backoff(attempt) + self.retry.jitter();
                    warn!(
                        listing = %request.listing_key,
                        provider,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Alert send failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        listing = %request.listing_key,
                        provider,
                        attempts = attempt,
                        error = %err,
                        "Alert delivery failed permanently"
                    );
                    return Delivery::Failed {
                        attempts: attempt,
                        reason: err.to_string(),
                    };
                }
            }
        }
    }
}
