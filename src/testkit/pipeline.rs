//! Pipelines wired for tests.

use std::sync::Arc;
use std::time::Duration;

use crate::application::notify::{AlertNotifier, RateLimiter, RetryPolicy};
use crate::application::pipeline::Pipeline;
use crate::application::rules::SharedRuleBook;
use crate::domain::money::Money;
use crate::port::outbound::dedup::DedupStore;
use crate::port::outbound::messaging::MessageSender;

use super::domain::{golf_rule_book, recipient};

/// Three attempts with no backoff or jitter.
pub fn instant_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::ZERO,
        multiplier: 1.0,
        max_jitter: Duration::ZERO,
    }
}

/// Notifier with [`instant_retry`] and a limiter that never throttles a test.
pub fn notifier(sender: Arc<dyn MessageSender>) -> Arc<AlertNotifier> {
    Arc::new(AlertNotifier::new(
        sender,
        Arc::new(RateLimiter::new(10_000)),
        instant_retry(),
    ))
}

/// Pipeline over [`golf_rule_book`] with the given store, sender and threshold.
pub fn golf_pipeline(
    store: Arc<dyn DedupStore>,
    sender: Arc<dyn MessageSender>,
    threshold: Money,
) -> Pipeline {
    Pipeline::new(
        SharedRuleBook::new(golf_rule_book()),
        store,
        notifier(sender),
        recipient(),
        threshold,
    )
}
