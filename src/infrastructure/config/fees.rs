//! Buyer-protection fee overrides shared by the marketplace sections.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::normalize::FeeSchedule;
use crate::domain::money::MAX_AMOUNT;

/// Optional override of a source's fee schedule.
///
/// Unset fields keep the source default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FeeConfig {
    /// Fraction of the price (e.g. 0.05 = 5%).
    #[serde(default)]
    pub percent: Option<Decimal>,
    /// Flat amount added to every purchase.
    #[serde(default)]
    pub fixed: Option<Decimal>,
}

impl FeeConfig {
    #[must_use]
    pub fn to_schedule(&self, default: FeeSchedule) -> FeeSchedule {
        FeeSchedule::new(
            self.percent.unwrap_or(default.percent),
            self.fixed.unwrap_or(default.fixed),
        )
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.percent.map_or(true, |p| p >= Decimal::ZERO && p < Decimal::ONE)
            && self
                .fixed
                .map_or(true, |f| f >= Decimal::ZERO && f <= MAX_AMOUNT)
    }
}
