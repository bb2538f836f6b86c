//! Risk tier configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::application::rules::RiskPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Margin at or above which a listing starts as low risk.
    #[serde(default = "default_low_margin")]
    pub low_margin: Decimal,
    /// Margin at or above which a listing starts as medium risk.
    #[serde(default = "default_medium_margin")]
    pub medium_margin: Decimal,
    /// Seller feedback percentage under which risk is raised; omit to disable.
    #[serde(default = "default_min_seller_feedback")]
    pub min_seller_feedback: Option<Decimal>,
}

fn default_low_margin() -> Decimal {
    dec!(0.5)
}

fn default_medium_margin() -> Decimal {
    dec!(0.2)
}

#[allow(clippy::unnecessary_wraps)]
fn default_min_seller_feedback() -> Option<Decimal> {
    Some(dec!(90))
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            low_margin: default_low_margin(),
            medium_margin: default_medium_margin(),
            min_seller_feedback: default_min_seller_feedback(),
        }
    }
}

impl From<&RiskConfig> for RiskPolicy {
    fn from(config: &RiskConfig) -> Self {
        Self {
            low_margin: config.low_margin,
            medium_margin: config.medium_margin,
            min_seller_feedback: config.min_seller_feedback,
        }
    }
}
