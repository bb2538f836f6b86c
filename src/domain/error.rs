//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by constructors that validate inputs, most
//! importantly [`RuleSet::new`](crate::domain::rule::RuleSet::new).
//!
//! # Examples
//!
//! A rule set without a default rule is rejected:
//!
//! ```
//! use flipper::domain::error::DomainError;
//! use flipper::domain::rule::{ResaleValue, Rule, RuleSet};
//! use rust_decimal_macros::dec;
//!
//! let result = RuleSet::new(vec![Rule::brand("Ping", ResaleValue::Multiplier(dec!(1.4)))]);
//!
//! assert!(matches!(result, Err(DomainError::MissingDefaultRule)));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::rule::MatchKind;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Every rule set needs a default rule to fall back on.
    #[error("rule set has no default rule")]
    MissingDefaultRule,

    /// Only one default rule may be declared.
    #[error("rule set declares more than one default rule")]
    MultipleDefaultRules,

    /// The default rule must scale the listing price.
    #[error("default rule must use a multiplier, not a fixed resale value")]
    DefaultRuleNotMultiplier,

    /// Two rules of the same kind target the same value.
    #[error("duplicate {kind} rule for {value:?}")]
    DuplicateRule {
        /// Match kind of the conflicting rules.
        kind: MatchKind,
        /// Normalized match value.
        value: String,
    },

    /// Model and brand rules need something to match against.
    #[error("{kind} rule has an empty match value")]
    EmptyMatchValue {
        /// Match kind of the offending rule.
        kind: MatchKind,
    },

    /// Multipliers must be positive.
    #[error("multiplier must be positive, got {value}")]
    NonPositiveMultiplier {
        /// The invalid multiplier.
        value: Decimal,
    },

    /// Fixed resale values cannot be negative.
    #[error("fixed resale value cannot be negative, got {value}")]
    NegativeFixedValue {
        /// The invalid amount.
        value: Decimal,
    },

    /// Resale values are capped so evaluation arithmetic stays in range.
    #[error("resale value {value} exceeds the limit of {limit}")]
    ResaleValueTooLarge {
        /// The rejected amount or multiplier.
        value: Decimal,
        /// The applicable cap.
        limit: Decimal,
    },

    /// Recipient numbers must be in international format.
    #[error("invalid MSISDN {value:?}: expected optional '+' followed by 8-15 digits")]
    InvalidMsisdn {
        /// The rejected input.
        value: String,
    },
}
