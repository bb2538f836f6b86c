//! Profitability verdicts produced by the rule engine.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ListingKey;
use super::money::Money;
use super::rule::MatchKind;

/// Qualitative confidence tier, ordered from safest to riskiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    const TIERS: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Move the tier by `steps`, clamping at [`RiskLevel::Low`] and [`RiskLevel::High`].
    #[must_use]
    pub fn shift(self, steps: i8) -> Self {
        let index = (self as i8 + steps).clamp(0, 2);
        Self::TIERS[index as usize]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one listing against the rule set.
///
/// `acquisition_cost = price + shipping_cost + buyer_protection_fee` and
/// `profit = estimated_resale_value - acquisition_cost` always hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub listing_key: ListingKey,
    pub acquisition_cost: Money,
    pub estimated_resale_value: Money,
    pub profit: Money,
    /// `profit / acquisition_cost`, zero when the cost is zero.
    pub margin: Decimal,
    pub risk_level: RiskLevel,
    pub matched_rule_kind: MatchKind,
    /// Brand or model the matched rule targets; `None` for the default rule.
    pub matched_value: Option<String>,
}

impl Evaluation {
    /// Whether profit clears `threshold` (inclusive).
    #[must_use]
    pub fn qualifies(&self, threshold: Money) -> bool {
        self.profit >= threshold
    }
}
