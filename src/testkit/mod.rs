//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`dedup`] - [`FlakyDedupStore`](dedup::FlakyDedupStore), a dedup store that can be made unavailable.
//! - [`domain`] - Builders for listings, rule books and recipients.
//! - [`source`] - [`ScriptedSource`](source::ScriptedSource), a marketplace that replays canned responses.
//! - [`messaging`] - Recording and scripted [`MessageSender`](crate::port::outbound::messaging::MessageSender)s.
//! - [`pipeline`] - Pipelines wired for tests: no backoff, generous rate limit.

pub mod dedup;
pub mod domain;
pub mod messaging;
pub mod pipeline;
pub mod source;
