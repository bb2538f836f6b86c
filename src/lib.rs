//! Flipper - secondhand marketplace scanner for profitable resale flips.
//!
//! Polls eBay and Vinted for new listings, normalizes them, scores each one
//! against a resale rule book and sends a WhatsApp alert exactly once per
//! listing whose profit clears the configured threshold.
//!
//! # Architecture
//!
//! - [`domain`] - Listings, rules, evaluations and dedup records
//! - [`port`] - Traits for marketplaces, messaging and dedup storage
//! - [`application`] - Normalizer, rule engine, notifier, pipeline and scheduler
//! - [`adapter`] - eBay, Vinted, WhatsApp and SQLite implementations plus the CLI
//! - [`infrastructure`] - Configuration, wiring and the service loop
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use flipper::application::rules::{RiskPolicy, RuleEngine};
//! use flipper::domain::rule::{ResaleValue, Rule, RuleSet};
//! use rust_decimal_macros::dec;
//!
//! let rules = RuleSet::new(vec![
//!     Rule::default_multiplier(dec!(1.2)),
//!     Rule::model("TaylorMade M6", ResaleValue::Fixed(dec!(150))),
//! ])
//! .unwrap();
//! let engine = RuleEngine::new(rules, RiskPolicy::default());
//! assert_eq!(engine.rules().len(), 2);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
