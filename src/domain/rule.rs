//! Resale rules and the validated, priority-indexed rule table.
//!
//! Rules are resolved by match kind, never by declaration order: a model rule
//! beats a brand rule, which beats the default rule. [`RuleSet`] indexes rules
//! in ordered maps keyed by [`term_key`], the same normalization title
//! extraction uses, so two rule files that differ only in ordering produce
//! identical resolutions.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::money::{round_money, Money, MAX_AMOUNT, MAX_MULTIPLIER};

/// Split text into lowercase alphanumeric tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Canonical form of a brand or model name: its tokens joined by single
/// spaces. `"TaylorMade-M6"` and `" taylormade  m6"` share one key.
#[must_use]
pub fn term_key(text: &str) -> String {
    tokenize(text).join(" ")
}

/// What a rule matches against, in resolution priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Exact model name extracted from the title.
    #[serde(alias = "exact-model", alias = "exact_model")]
    Model,
    /// Brand name extracted from the title.
    Brand,
    /// Fallback applied when nothing more specific matches.
    Default,
}

impl MatchKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Brand => "brand",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule estimates the resale value of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResaleValue {
    /// A known resale price, independent of the asking price.
    Fixed(Money),
    /// Asking price scaled by a factor.
    Multiplier(Decimal),
}

impl ResaleValue {
    /// Estimated resale value for a listing offered at `price`.
    #[must_use]
    pub fn estimate(self, price: Money) -> Money {
        match self {
            Self::Fixed(amount) => amount,
            Self::Multiplier(factor) => round_money(price * factor),
        }
    }

    fn validate(self) -> Result<(), DomainError> {
        match self {
            Self::Fixed(amount) if amount < Decimal::ZERO => {
                Err(DomainError::NegativeFixedValue { value: amount })
            }
            Self::Multiplier(factor) if factor <= Decimal::ZERO => {
                Err(DomainError::NonPositiveMultiplier { value: factor })
            }
            Self::Fixed(amount) if amount > MAX_AMOUNT => Err(DomainError::ResaleValueTooLarge {
                value: amount,
                limit: MAX_AMOUNT,
            }),
            Self::Multiplier(factor) if factor > MAX_MULTIPLIER => {
                Err(DomainError::ResaleValueTooLarge {
                    value: factor,
                    limit: MAX_MULTIPLIER,
                })
            }
            _ => Ok(()),
        }
    }
}

/// A single resale rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "match")]
    pub kind: MatchKind,
    /// Model or brand name; empty for the default rule.
    #[serde(default)]
    pub value: String,
    pub resale: ResaleValue,
}

impl Rule {
    /// Rule matching an exact model name.
    pub fn model(value: impl Into<String>, resale: ResaleValue) -> Self {
        Self {
            kind: MatchKind::Model,
            value: value.into(),
            resale,
        }
    }

    /// Rule matching a brand name.
    pub fn brand(value: impl Into<String>, resale: ResaleValue) -> Self {
        Self {
            kind: MatchKind::Brand,
            value: value.into(),
            resale,
        }
    }

    /// Fallback rule scaling the asking price.
    #[must_use]
    pub fn default_multiplier(factor: Decimal) -> Self {
        Self {
            kind: MatchKind::Default,
            value: String::new(),
            resale: ResaleValue::Multiplier(factor),
        }
    }
}

/// Validated rule table with fixed resolution order.
///
/// Invariants: exactly one default rule, which uses a multiplier; at most one
/// rule per `(kind, term_key(value))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    models: BTreeMap<String, Rule>,
    brands: BTreeMap<String, Rule>,
    default: Rule,
}

impl RuleSet {
    /// Validate and index a collection of rules.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the default rule is missing, duplicated or
    /// not a multiplier, if two rules collide, or if any rule carries an
    /// empty match value or an invalid resale amount.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Result<Self, DomainError> {
        let mut models = BTreeMap::new();
        let mut brands = BTreeMap::new();
        let mut default = None;

        for mut rule in rules {
            rule.resale.validate()?;
            rule.value = rule.value.trim().to_string();

            let index = match rule.kind {
                MatchKind::Default => {
                    if !matches!(rule.resale, ResaleValue::Multiplier(_)) {
                        return Err(DomainError::DefaultRuleNotMultiplier);
                    }
                    if default.replace(rule).is_some() {
                        return Err(DomainError::MultipleDefaultRules);
                    }
                    continue;
                }
                MatchKind::Model => &mut models,
                MatchKind::Brand => &mut brands,
            };

            let normalized = term_key(&rule.value);
            if normalized.is_empty() {
                return Err(DomainError::EmptyMatchValue { kind: rule.kind });
            }
            if index.contains_key(&normalized) {
                return Err(DomainError::DuplicateRule {
                    kind: rule.kind,
                    value: normalized,
                });
            }
            index.insert(normalized, rule);
        }

        let default = default.ok_or(DomainError::MissingDefaultRule)?;
        Ok(Self {
            models,
            brands,
            default,
        })
    }

    /// Resolve the rule for the extracted model and brand.
    ///
    /// Model beats brand beats default; names are compared by [`term_key`].
    #[must_use]
    pub fn resolve(&self, model: Option<&str>, brand: Option<&str>) -> &Rule {
        model
            .and_then(|m| self.models.get(&term_key(m)))
            .or_else(|| brand.and_then(|b| self.brands.get(&term_key(b))))
            .unwrap_or(&self.default)
    }

    #[must_use]
    pub fn default_rule(&self) -> &Rule {
        &self.default
    }

    /// Model names referenced by model rules, as declared.
    pub fn model_values(&self) -> impl Iterator<Item = &str> {
        self.models.values().map(|r| r.value.as_str())
    }

    /// Brand names referenced by brand rules, as declared.
    pub fn brand_values(&self) -> impl Iterator<Item = &str> {
        self.brands.values().map(|r| r.value.as_str())
    }

    /// Total number of rules, including the default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len() + self.brands.len() + 1
    }

    /// Always false: a valid rule set holds at least the default rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
