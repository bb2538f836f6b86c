//! Sliding-window limiter for outbound messages.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

const WINDOW: Duration = Duration::from_secs(60);

/// Allows at most `limit_per_minute` acquisitions in any 60 second window.
///
/// Shared by every send path so the provider quota holds regardless of how
/// many listings are processed concurrently.
#[derive(Debug)]
pub struct RateLimiter {
    sent: Mutex<VecDeque<Instant>>,
    limit_per_minute: usize,
}

impl RateLimiter {
    /// A limit of zero is treated as one.
    #[must_use]
    pub fn new(limit_per_minute: u32) -> Self {
        Self {
            sent: Mutex::new(VecDeque::new()),
            limit_per_minute: limit_per_minute.max(1) as usize,
        }
    }

    /// Wait until a slot is free, then take it.
    pub async fn acquire(&self) {
        loop {
            let wake_at = {
                let mut sent = self.sent.lock().await;
                let now = Instant::now();
                while sent
                    .front()
                    .is_some_and(|at| now.duration_since(*at) >= WINDOW)
                {
                    sent.pop_front();
                }
                if sent.len() < self.limit_per_minute {
                    sent.push_back(now);
                    return;
                }
                match sent.front() {
                    Some(oldest) => *oldest + WINDOW,
                    None => continue,
                }
            };
            debug!(limit = self.limit_per_minute, "Outbound rate limit reached, waiting");
            sleep_until(wake_at).await;
        }
    }

    /// Slots taken in the current window.
    pub async fn in_window(&self) -> usize {
        let sent = self.sent.lock().await;
        let now = Instant::now();
        sent.iter()
            .filter(|at| now.duration_since(**at) < WINDOW)
            .count()
    }
}
