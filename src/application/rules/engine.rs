//! Listing evaluation against a rule set.

use rust_decimal::Decimal;

use super::risk::RiskPolicy;
use crate::domain::evaluation::Evaluation;
use crate::domain::listing::Listing;
use crate::domain::rule::{MatchKind, RuleSet};

/// Pure, deterministic scorer. Identical listings and rules always produce
/// identical evaluations.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: RuleSet,
    risk: RiskPolicy,
}

impl RuleEngine {
    #[must_use]
    pub fn new(rules: RuleSet, risk: RiskPolicy) -> Self {
        Self { rules, risk }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub fn evaluate(&self, listing: &Listing) -> Evaluation {
        let rule = self.rules.resolve(
            listing.extracted_model.as_deref(),
            listing.extracted_brand.as_deref(),
        );

        let acquisition_cost = listing.acquisition_cost();
        let estimated_resale_value = rule.resale.estimate(listing.price);
        let profit = estimated_resale_value - acquisition_cost;
        let margin = if acquisition_cost.is_zero() {
            Decimal::ZERO
        } else {
            profit / acquisition_cost
        };

        Evaluation {
            listing_key: listing.key(),
            acquisition_cost,
            estimated_resale_value,
            profit,
            margin,
            risk_level: self.risk.assess(margin, rule.kind, listing.seller_feedback),
            matched_rule_kind: rule.kind,
            matched_value: (rule.kind != MatchKind::Default).then(|| rule.value.clone()),
        }
    }
}
