//! Risk tiers from margin, match confidence and seller reputation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::evaluation::RiskLevel;
use crate::domain::rule::MatchKind;

/// Thresholds for [`RiskPolicy::assess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskPolicy {
    /// Margin at or above which the base tier is low.
    pub low_margin: Decimal,
    /// Margin at or above which the base tier is medium.
    pub medium_margin: Decimal,
    /// Seller feedback percentage below which risk goes up one tier.
    pub min_seller_feedback: Option<Decimal>,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            low_margin: dec!(0.5),
            medium_margin: dec!(0.2),
            min_seller_feedback: Some(dec!(90)),
        }
    }
}

impl RiskPolicy {
    /// Tier for a listing.
    ///
    /// A model match lowers the margin tier by one and a default match raises
    /// it by one. A known seller feedback score under the minimum raises the
    /// result by one more. Unknown feedback is not penalized.
    #[must_use]
    pub fn assess(
        &self,
        margin: Decimal,
        kind: MatchKind,
        seller_feedback: Option<Decimal>,
    ) -> RiskLevel {
        let base = if margin >= self.low_margin {
            RiskLevel::Low
        } else if margin >= self.medium_margin {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };

        let confidence = match kind {
            MatchKind::Model => -1,
            MatchKind::Brand => 0,
            MatchKind::Default => 1,
        };

        let reputation = match (self.min_seller_feedback, seller_feedback) {
            (Some(min), Some(score)) if score < min => 1,
            _ => 0,
        };

        base.shift(confidence).shift(reputation)
    }
}
