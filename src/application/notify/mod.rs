//! Alert rendering and delivery.

mod format;
mod notifier;
mod rate_limit;

pub use format::format_alert;
pub use notifier::{AlertNotifier, Delivery, RetryPolicy};
pub use rate_limit::RateLimiter;
